//! Execution driver.
//!
//! This module runs a processor against a [`System`] until something stops it. It performs:
//! 1. **Startup:** Applies one-shot pokes, then replays every event due at sample 0 before
//!    the core is attached, so the reset vector is read after those writes.
//! 2. **Batching:** Calls [`Processor::run_batch`] with a bounded budget, trimmed so an
//!    instruction limit is never overshot and a cycle limit ends at the first step past it.
//! 3. **Wait protocol:** After a batch that leaves the core waiting, delivers one interrupt
//!    request and clears it straight away.
//! 4. **Reporting:** Catches the [`Stop`] raised anywhere below and returns a [`RunReport`].
//!
//! The loop never looks at the core's halt state. A core frozen by `STP` keeps being
//! handed batches until the script or a limit ends the run.

use std::fmt;
use std::io::Write;

use crate::common::{Flow, Stop};
use crate::config::RunConfig;
use crate::core::processor::{CpuSnapshot, Processor, Tally};
use crate::sim::script::Poke;
use crate::soc::System;
use crate::stats::RunStats;

/// Cycles a single 65C02 instruction can take, used to size batches under a cycle limit.
const CYCLES_PER_STEP_BOUND: u64 = 8;

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    /// A [`Stop`] unwound the run.
    Stopped(Stop),
    /// The configured instruction limit was reached.
    InstructionLimit,
    /// The configured cycle limit was reached.
    CycleLimit,
}

impl fmt::Display for RunEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped(stop) => write!(f, "{stop}"),
            Self::InstructionLimit => write!(f, "instruction limit reached"),
            Self::CycleLimit => write!(f, "cycle limit reached"),
        }
    }
}

/// Outcome of [`Driver::run`].
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Why the run ended.
    pub end: RunEnd,
    /// Counters gathered during the run.
    pub stats: RunStats,
    /// Core state at the end; all zero if the run stopped before reset.
    pub cpu: CpuSnapshot,
}

impl RunReport {
    /// Process exit status for this outcome.
    ///
    /// Every ending is a success except a sink that stopped accepting samples,
    /// including one that failed its final flush.
    pub const fn exit_code(&self) -> i32 {
        match self.end {
            RunEnd::Stopped(Stop::SinkClosed) => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stopped: {}", self.end)?;
        writeln!(
            f,
            "Exiting after {} cycles, {} instructions, {} samples ({:.3}s)",
            self.stats.cycles,
            self.stats.instructions,
            self.stats.samples,
            self.stats.audio_seconds()
        )?;
        write!(f, "Ran {} cycles: {}", self.stats.cycles, self.cpu)
    }
}

/// Drives one playback run.
#[derive(Debug)]
pub struct Driver<W> {
    system: System<W>,
    run: RunConfig,
    pokes: Vec<Poke>,
}

impl<W: Write> Driver<W> {
    /// Creates a driver over `system` with the given batch budget and limits.
    pub const fn new(system: System<W>, run: RunConfig) -> Self {
        Self {
            system,
            run,
            pokes: Vec::new(),
        }
    }

    /// Adds writes applied before the sample-0 replay.
    pub fn with_pokes(mut self, pokes: Vec<Poke>) -> Self {
        self.pokes = pokes;
        self
    }

    /// Returns the context.
    pub const fn system(&self) -> &System<W> {
        &self.system
    }

    /// Consumes the driver and returns the context.
    pub fn into_system(self) -> System<W> {
        self.system
    }

    /// Runs to completion on a core built with [`Processor::attach`].
    pub fn run<P: Processor>(&mut self) -> RunReport {
        self.run_with(|bus: &mut System<W>| P::attach(bus))
    }

    /// Runs to completion on a core built by `attach`.
    ///
    /// `attach` is called once, after the pokes and the sample-0 replay. If that
    /// replay already stops the run, no core is built and the snapshot is empty.
    /// The sink is flushed last; if that fails the run ends as a closed sink.
    pub fn run_with<P, F>(&mut self, attach: F) -> RunReport
    where
        P: Processor,
        F: FnOnce(&mut System<W>) -> P,
    {
        let mut tally = Tally::default();
        let mut cpu = None;

        let end = match self.startup() {
            Err(stop) => RunEnd::Stopped(stop),
            Ok(()) => {
                let core = cpu.insert(attach(&mut self.system));
                self.execute(core, &mut tally)
            }
        };

        let end = match self.system.clock.flush() {
            Err(e) if end != RunEnd::Stopped(Stop::SinkClosed) => {
                tracing::error!("failed to flush sample sink: {e}");
                RunEnd::Stopped(Stop::SinkClosed)
            }
            _ => end,
        };

        let stats = &mut self.system.stats;
        stats.cycles = tally.cycles;
        stats.instructions = tally.instructions;
        stats.samples = self.system.clock.samples();
        stats.finish();

        RunReport {
            end,
            stats: self.system.stats.clone(),
            cpu: cpu.as_ref().map(P::snapshot).unwrap_or_default(),
        }
    }

    fn startup(&mut self) -> Flow {
        for poke in &self.pokes {
            self.system.poke(poke)?;
        }
        self.system.replay(0)
    }

    fn execute<P: Processor>(&mut self, cpu: &mut P, tally: &mut Tally) -> RunEnd {
        let batch = u64::from(self.run.batch_steps.max(1));
        loop {
            let mut budget = batch;
            if let Some(limit) = self.run.max_instructions {
                let left = limit.saturating_sub(tally.instructions);
                if left == 0 {
                    return RunEnd::InstructionLimit;
                }
                budget = budget.min(left);
            }
            if let Some(limit) = self.run.max_cycles {
                let left = limit.saturating_sub(tally.cycles);
                if left == 0 {
                    return RunEnd::CycleLimit;
                }
                budget = budget.min((left / CYCLES_PER_STEP_BOUND).max(1));
            }

            if let Err(stop) = cpu.run_batch(&mut self.system, budget as u32, tally) {
                return RunEnd::Stopped(stop);
            }

            if cpu.is_waiting() {
                tracing::trace!("IRQ");
                self.system.stats.interrupts += 1;
                if let Err(stop) = cpu.request_interrupt(&mut self.system, tally) {
                    return RunEnd::Stopped(stop);
                }
                cpu.clear_interrupt();
            }
        }
    }
}
