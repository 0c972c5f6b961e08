//! CPU-facing bus interface.
//!
//! This module defines the callbacks a processor uses to reach the rest of the system. It provides:
//! 1. **Reads:** Infallible byte reads at a raw 16-bit address.
//! 2. **Writes:** Byte writes that may unwind the current instruction with a [`Stop`].
//! 3. **Halt Notification:** A diagnostic hook for illegal or stopped conditions.
//!
//! The bus is passed into every processor call rather than owned by the processor, so a
//! single context (memory, timeline, sample clock) is threaded explicitly through the
//! whole callback chain.

use crate::common::Flow;
#[cfg(doc)]
use crate::common::Stop;

/// Memory and signalling interface seen by a processor.
pub trait Bus {
    /// Reads one byte at a raw 16-bit address.
    fn read(&mut self, addr: u16) -> u8;

    /// Writes one byte at a raw 16-bit address.
    ///
    /// A write may produce a sample and replay script events before it returns. If
    /// that chain ends the run, the [`Stop`] comes back here and the caller must
    /// propagate it with `?` without touching further state.
    fn write(&mut self, addr: u16, value: u8) -> Flow;

    /// Reports an illegal opcode or a stopped core.
    ///
    /// Diagnostic only: must not alter control flow.
    fn notify_halt(&mut self);
}
