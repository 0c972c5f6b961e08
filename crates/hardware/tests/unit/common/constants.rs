//! Unit tests for system-wide constants.
//!
//! This module verifies that the memory map constants keep the relationships
//! the sample trap and the mirrored image depend on.

use acpsim_core::common::constants::*;

#[test]
fn test_ram_is_4kb() {
    assert_eq!(RAM_SIZE, 4096, "RAM_SIZE should be 4KB");
}

#[test]
fn test_address_space_is_whole_mirrors() {
    assert_eq!(0x1_0000 % RAM_SIZE, 0, "the 64 KiB space should hold whole copies");
}

#[test]
fn test_trap_aliases_slot_zero() {
    assert_eq!(usize::from(SAMPLE_TRAP) % RAM_SIZE, 0);
}

#[test]
fn test_vectors_land_at_top_of_image() {
    assert_eq!(usize::from(RESET_VECTOR) % RAM_SIZE, RAM_SIZE - 4);
    assert_eq!(usize::from(IRQ_VECTOR) % RAM_SIZE, RAM_SIZE - 2);
}

#[test]
fn test_default_batch_is_int_max() {
    assert_eq!(DEFAULT_BATCH_STEPS, i32::MAX as u32);
}

#[test]
fn test_sample_rate() {
    assert_eq!(SAMPLE_RATE_HZ, 44_192);
}
