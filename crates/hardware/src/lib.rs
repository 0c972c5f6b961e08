//! GameTank audio coprocessor playback harness.
//!
//! This crate runs an ACP ROM sample-accurately against a timed poke script:
//! 1. **Memory:** A 4 KiB RAM image mirrored across the 16-bit address space, with a
//!    write trap at `0x8000` that emits one audio sample per write.
//! 2. **Script:** Timed memory writes keyed on the sample count, replayed as samples are
//!    produced, plus a termination sentinel.
//! 3. **Core:** A processor capability with a bundled W65C02S implementation.
//! 4. **Simulation:** ROM/script loading, the batch driver with its wait/interrupt
//!    protocol, configuration, and run statistics.

/// Common types and constants (sizes, trap address, errors, stop signal).
pub mod common;
/// Harness configuration (batch budget, run limits, logging).
pub mod config;
/// Bus and processor interfaces and the W65C02S core.
pub mod core;
/// Script parsing, timeline, loading and the execution driver.
pub mod sim;
/// RAM image, sample clock and the owning system context.
pub mod soc;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Bundled instruction core.
pub use crate::core::W65c02;
/// Execution driver and its outcome.
pub use crate::sim::driver::{Driver, RunEnd, RunReport};
/// Owning context implementing the processor bus; construct with `System::new`.
pub use crate::soc::System;
