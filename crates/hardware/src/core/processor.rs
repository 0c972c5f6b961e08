//! Processor capability.
//!
//! This module defines the interface the driver uses to run an instruction core. It provides:
//! 1. **Construction:** Attaching a core to a bus (reset, vector fetch).
//! 2. **Execution:** Bounded run batches that accumulate cycles and instructions.
//! 3. **Interrupts:** The wait-state query and interrupt request/clear pair.
//! 4. **Observation:** A register and status snapshot for diagnostics.
//!
//! Any conforming core can be substituted; the harness never looks inside one.

use std::fmt;

use super::bus::Bus;
use crate::common::Flow;

/// Running totals filled in by [`Processor::run_batch`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Clock cycles consumed.
    pub cycles: u64,
    /// Instructions executed.
    pub instructions: u64,
}

/// Register and status snapshot of a processor, for diagnostics only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuSnapshot {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (low byte, page 1).
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status register.
    pub status: u8,
    /// Core is stopped (`STP`) and no longer executes.
    pub freeze: bool,
    /// Core is parked waiting for an interrupt (`WAI`).
    pub waiting: bool,
    /// An illegal opcode has been seen.
    pub illegal_opcode: bool,
    /// Address of the most recent illegal opcode.
    pub illegal_opcode_src: u16,
}

impl fmt::Display for CpuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={:02x} X={:02x} Y={:02x} sp={:02x} pc={:04x} st={:02x} freeze={} waiting={} illegal={} ilsrc={:04x}",
            self.a,
            self.x,
            self.y,
            self.sp,
            self.pc,
            self.status,
            u8::from(self.freeze),
            u8::from(self.waiting),
            u8::from(self.illegal_opcode),
            self.illegal_opcode_src,
        )
    }
}

/// An instruction core the driver can step.
///
/// Every method that may touch memory takes the bus explicitly and returns a
/// [`Flow`], so a termination raised deep inside a write unwinds through the core.
pub trait Processor {
    /// Creates a core bound to `bus` and puts it through reset.
    fn attach<B: Bus>(bus: &mut B) -> Self
    where
        Self: Sized;

    /// Executes up to `max_steps` instructions.
    ///
    /// Returns early when the core stops or parks in a wait state. Cycles and
    /// instructions are added to `tally` as they retire, so the totals are correct
    /// even when the batch is unwound by a stop.
    fn run_batch<B: Bus>(&mut self, bus: &mut B, max_steps: u32, tally: &mut Tally) -> Flow;

    /// Returns `true` while the core is parked waiting for an interrupt.
    fn is_waiting(&self) -> bool;

    /// Asserts the interrupt request line.
    ///
    /// Cores that service the request immediately push their state through `bus`.
    fn request_interrupt<B: Bus>(&mut self, bus: &mut B, tally: &mut Tally) -> Flow;

    /// Releases the interrupt request line.
    fn clear_interrupt(&mut self);

    /// Returns the current register and status state.
    fn snapshot(&self) -> CpuSnapshot;
}
