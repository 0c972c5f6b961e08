//! Interrupt Entry and Return.
//!
//! This module implements the 65C02 interrupt sequence. It performs the following:
//! 1. **IRQ Entry:** Pushes PC and status (B clear), sets I, clears D, and jumps through `0xFFFE`.
//! 2. **BRK:** The same sequence with B set in the pushed status and PC past the signature byte.
//! 3. **RTI:** Restores status and PC from the stack.
//!
//! The pushes are ordinary bus writes and can be unwound like any other store.

use super::W65c02;
use super::flags::{D, I};
use crate::common::Flow;
use crate::common::constants::IRQ_VECTOR;
use crate::core::bus::Bus;

/// Cycles for the hardware IRQ sequence.
pub const IRQ_CYCLES: u8 = 7;

impl W65c02 {
    /// Services a hardware interrupt request.
    pub(super) fn irq<B: Bus>(&mut self, bus: &mut B) -> Flow {
        self.interrupt(bus, false)
    }

    /// Executes `BRK`; PC already points at the signature byte.
    pub(super) fn brk<B: Bus>(&mut self, bus: &mut B) -> Flow {
        self.pc = self.pc.wrapping_add(1);
        self.interrupt(bus, true)
    }

    /// Executes `RTI`.
    pub(super) fn rti<B: Bus>(&mut self, bus: &mut B) {
        let status = self.pull(bus);
        self.p = super::flags::Status::from_byte(status);
        self.pc = self.pull_word(bus);
    }

    fn interrupt<B: Bus>(&mut self, bus: &mut B, brk: bool) -> Flow {
        self.push_word(bus, self.pc)?;
        self.push(bus, self.p.pushed(brk))?;
        self.p.set(I, true);
        self.p.set(D, false);
        self.pc = self.read_word(bus, IRQ_VECTOR);
        Ok(())
    }
}
