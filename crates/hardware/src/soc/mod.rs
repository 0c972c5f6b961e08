//! Coprocessor system components.
//!
//! This module organizes the state a processor runs against: the mirrored RAM
//! image, the sample clock and its sink, and the owning context that routes
//! bus writes to the sample trap and the script timeline.

/// Mirrored RAM image.
pub mod memory;

/// Sample clock and raw output sink.
pub mod sink;

/// Owning context implementing the processor bus.
pub mod system;

pub use system::System;
