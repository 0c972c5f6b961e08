//! Global System Constants.
//!
//! This module defines the fixed parameters of the audio coprocessor model. It includes:
//! 1. **Memory Constants:** Size of the RAM image and the raw sample trap address.
//! 2. **Vector Constants:** 65C02 reset and IRQ vector locations.
//! 3. **Playback Constants:** Output sample rate and the default run-batch budget.

/// Size of the coprocessor RAM image in bytes (4 KiB).
///
/// Every raw 16-bit address is reduced modulo this size before it indexes storage,
/// so the image is mirrored sixteen times across the CPU address space.
pub const RAM_SIZE: usize = 0x1000;

/// Raw (unreduced) address whose write produces one output sample.
///
/// The comparison happens on the raw address; storage still lands at
/// `SAMPLE_TRAP % RAM_SIZE` (index 0).
pub const SAMPLE_TRAP: u16 = 0x8000;

/// Output rate of the coprocessor DAC in samples per second.
pub const SAMPLE_RATE_HZ: u32 = 44_192;

/// Default instruction budget for one `run_batch` call (`i32::MAX`).
pub const DEFAULT_BATCH_STEPS: u32 = i32::MAX as u32;

/// Location of the low byte of the 65C02 reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Location of the low byte of the 65C02 IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Base of the 65C02 hardware stack page.
pub const STACK_BASE: u16 = 0x0100;
