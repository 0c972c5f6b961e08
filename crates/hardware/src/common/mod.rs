//! Common utilities and types used throughout the playback harness.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Constants:** RAM size, sample trap address, vectors and playback rate.
//! 2. **Error Handling:** Fatal harness errors and their exit codes.
//! 3. **Control Signals:** The `Stop` outcome that unwinds a run back to the driver.

/// Fixed system parameters.
pub mod constants;

/// Fatal error types.
pub mod error;

/// Out-of-band termination signal.
pub mod signal;

pub use constants::{RAM_SIZE, SAMPLE_RATE_HZ, SAMPLE_TRAP};
pub use error::HarnessError;
pub use signal::{Flow, Stop};
