//! Processor interface and the bundled instruction core.
//!
//! This module contains the boundary between the harness and a CPU: the bus
//! callbacks a core uses to reach memory, the processor capability the driver
//! steps, and a W65C02S core that implements it.

/// Bus callbacks seen by a processor.
pub mod bus;

/// W65C02S instruction core.
pub mod cpu;

/// Processor capability, cycle tally and register snapshot.
pub mod processor;

pub use self::bus::Bus;
pub use self::cpu::W65c02;
pub use self::processor::{CpuSnapshot, Processor, Tally};
