//! Coprocessor RAM image.
//!
//! This module implements the fixed-size byte store the CPU runs against. It provides:
//! 1. **Storage:** `RAM_SIZE` bytes indexed by the raw address reduced modulo the size.
//! 2. **Trap Predicate:** Recognition of the raw sample trap address.
//! 3. **Loading and Dumping:** Whole-image load from a ROM and raw access for the RAM dump.
//!
//! The trap check always looks at the raw 16-bit address. `0x8000` traps; `0x0000`,
//! `0x1000` and every other alias of storage slot 0 do not.

use crate::common::constants::{RAM_SIZE, SAMPLE_TRAP};

/// The 4 KiB RAM image, mirrored across the 16-bit address space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryImage {
    bytes: Box<[u8; RAM_SIZE]>,
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryImage {
    /// Creates a zero-filled image.
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; RAM_SIZE]),
        }
    }

    /// Creates an image holding a copy of `rom`.
    ///
    /// The caller has already checked the length; see
    /// [`loader::load_rom`](crate::sim::loader::load_rom).
    pub fn from_rom(rom: &[u8; RAM_SIZE]) -> Self {
        Self {
            bytes: Box::new(*rom),
        }
    }

    /// Reduces a raw address to its storage index.
    #[inline(always)]
    pub const fn index(addr: u16) -> usize {
        addr as usize % RAM_SIZE
    }

    /// Returns `true` if a write to this raw address produces a sample.
    #[inline(always)]
    pub const fn is_sample_trap(addr: u16) -> bool {
        addr == SAMPLE_TRAP
    }

    /// Reads the byte at a raw address.
    #[inline(always)]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[Self::index(addr)]
    }

    /// Stores a byte at a raw address.
    ///
    /// Plain storage only; the sample trap is handled by the owning
    /// [`System`](crate::soc::System).
    #[inline(always)]
    pub fn store(&mut self, addr: u16, value: u8) {
        self.bytes[Self::index(addr)] = value;
    }

    /// Returns the whole image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}
