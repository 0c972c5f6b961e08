//! The owning playback context and its bus.
//!
//! This module ties the memory image, the script timeline and the sample clock into
//! the single context a processor runs against. It performs:
//! 1. **Bus access:** Reads and writes against the mirrored RAM image.
//! 2. **Sample trap:** A write to the raw trap address stores the byte, then emits it.
//! 3. **Replay:** Every emission applies the script events that have come due.
//! 4. **Halt reporting:** Counts and logs halt notices from the core.
//!
//! Writes made while replaying go back through [`Bus::write`], so a payload that
//! crosses the trap address emits a sample and replays further events from inside
//! the outer replay. The cursor is advanced before an event is applied and the
//! clock only counts up, which keeps every level of that recursion consistent.

use std::io::Write;

use crate::common::{Flow, Stop};
use crate::config::Config;
use crate::core::bus::Bus;
use crate::sim::script::Poke;
use crate::sim::timeline::ScriptTimeline;
use crate::soc::memory::MemoryImage;
use crate::soc::sink::SampleClock;
use crate::stats::RunStats;

/// Memory, timeline and sample clock, owned together.
#[derive(Debug)]
pub struct System<W> {
    /// The mirrored RAM image.
    pub memory: MemoryImage,
    /// Sorted script events and the replay cursor.
    pub timeline: ScriptTimeline,
    /// Sample counter and raw output sink.
    pub clock: SampleClock<W>,
    /// Counters updated by the bus and the driver.
    pub stats: RunStats,
    log_events: bool,
}

impl<W: Write> System<W> {
    /// Builds a context at sample zero.
    ///
    /// # Arguments
    ///
    /// * `memory` - The loaded ROM image.
    /// * `timeline` - Parsed and sorted script events.
    /// * `out` - Sink for the raw sample stream.
    pub fn new(memory: MemoryImage, timeline: ScriptTimeline, out: W) -> Self {
        Self {
            memory,
            timeline,
            clock: SampleClock::new(out),
            stats: RunStats::default(),
            log_events: false,
        }
    }

    /// Applies the sample budget and event logging level from `config`.
    ///
    /// The budget is the tighter of the sample and duration limits.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.clock = self.clock.with_limit(config.run.sample_budget());
        self.log_events = config.general.log_events;
        self
    }

    /// Number of samples emitted so far.
    #[inline]
    pub const fn samples(&self) -> u64 {
        self.clock.samples()
    }

    /// Writes one sample, then replays every event due at the new count.
    pub fn emit(&mut self, sample: u8) -> Flow {
        tracing::trace!("sample {sample:02x}");
        self.clock.tick(sample)?;
        self.replay(self.clock.samples())?;
        self.clock.check_limit()
    }

    /// Applies, in order, every unprocessed event due at or before `samples`.
    ///
    /// Stops at the first event still in the future. The sentinel ends the run
    /// with [`Stop::Script`]; an empty payload at a nonzero address does nothing.
    /// Payload bytes go to successive raw addresses, wrapping at 16 bits.
    pub fn replay(&mut self, samples: u64) -> Flow {
        while let Some(index) = self.timeline.next_due(samples) {
            self.stats.events_replayed += 1;

            let event = self.timeline.event(index);
            if self.log_events {
                tracing::info!("replay @{}: {event}", self.clock.samples());
            } else {
                tracing::debug!("replay @{}: {event}", self.clock.samples());
            }

            if event.is_sentinel() {
                return Err(Stop::Script {
                    samples: self.clock.samples(),
                });
            }
            if event.payload.is_empty() {
                continue;
            }

            let mut addr = event.address;
            for offset in 0..event.payload.len() {
                let value = self.timeline.event(index).payload[offset];
                self.write(addr, value)?;
                addr = addr.wrapping_add(1);
            }
        }
        Ok(())
    }

    /// Writes `poke.bytes` to successive addresses through the bus.
    pub fn poke(&mut self, poke: &Poke) -> Flow {
        let mut addr = poke.address;
        for &value in &poke.bytes {
            self.write(addr, value)?;
            addr = addr.wrapping_add(1);
        }
        Ok(())
    }
}

impl<W: Write> Bus for System<W> {
    #[inline(always)]
    fn read(&mut self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) -> Flow {
        self.memory.store(addr, value);
        if MemoryImage::is_sample_trap(addr) {
            self.emit(value)?;
        }
        Ok(())
    }

    fn notify_halt(&mut self) {
        self.stats.halts += 1;
        tracing::warn!("CPU Halt.");
    }
}
