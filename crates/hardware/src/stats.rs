//! Run statistics collection and reporting.
//!
//! This module tracks what a playback run did. It provides:
//! 1. **Execution:** Total cycles and instructions from the core.
//! 2. **Playback:** Samples emitted and the seconds of audio they represent.
//! 3. **Events:** Script events replayed, interrupts delivered, halt notices.
//! 4. **Reporting:** The end-of-run summary, written to the diagnostic stream.

use std::time::{Duration, Instant};

use crate::common::constants::SAMPLE_RATE_HZ;

/// Counters for one playback run.
#[derive(Clone, Debug)]
pub struct RunStats {
    start_time: Instant,
    /// Wall-clock time from construction to [`finish`](Self::finish).
    pub elapsed: Duration,
    /// Total clock cycles consumed by the core.
    pub cycles: u64,
    /// Total instructions executed.
    pub instructions: u64,
    /// Samples written to the sink.
    pub samples: u64,
    /// Script events consumed from the timeline, sentinels included.
    pub events_replayed: u64,
    /// Interrupt requests delivered to a waiting core.
    pub interrupts: u64,
    /// Halt notices raised by the core.
    pub halts: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
            cycles: 0,
            instructions: 0,
            samples: 0,
            events_replayed: 0,
            interrupts: 0,
            halts: 0,
        }
    }
}

impl RunStats {
    /// Records the elapsed wall-clock time.
    pub fn finish(&mut self) {
        self.elapsed = self.start_time.elapsed();
    }

    /// Seconds of audio represented by the emitted samples.
    pub fn audio_seconds(&self) -> f64 {
        self.samples as f64 / f64::from(SAMPLE_RATE_HZ)
    }

    /// Prints the summary block to stderr.
    pub fn print(&self) {
        let seconds = self.elapsed.as_secs_f64();
        let realtime = if seconds > 0.0 {
            self.audio_seconds() / seconds
        } else {
            0.0
        };

        eprintln!("==========================================================");
        eprintln!("ACP PLAYBACK STATISTICS");
        eprintln!("==========================================================");
        eprintln!("host_seconds             {seconds:.4} s");
        eprintln!("sim_cycles               {}", self.cycles);
        eprintln!("sim_insts                {}", self.instructions);
        eprintln!("samples                  {}", self.samples);
        eprintln!("audio_seconds            {:.4} s", self.audio_seconds());
        eprintln!("realtime_factor          {realtime:.2}x");
        eprintln!("----------------------------------------------------------");
        eprintln!("events_replayed          {}", self.events_replayed);
        eprintln!("interrupts               {}", self.interrupts);
        eprintln!("halts                    {}", self.halts);
        eprintln!("==========================================================");
    }
}
