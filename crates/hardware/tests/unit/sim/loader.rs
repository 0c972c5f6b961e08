//! # Loader Tests
//!
//! ROM loading with the exact-size rule, script files, and timeline assembly.

use std::io::Write;

use acpsim_core::common::{HarnessError, RAM_SIZE};
use acpsim_core::sim::loader;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn temp_file(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_rom_exact_size() {
    let mut rom = vec![0u8; RAM_SIZE];
    rom[0x123] = 0x77;
    rom[RAM_SIZE - 1] = 0x99;
    let file = temp_file(&rom);

    let image = loader::load_rom(file.path()).unwrap();
    assert_eq!(image.as_bytes(), rom.as_slice());
}

#[test]
fn test_load_rom_ignores_trailing_bytes() {
    let mut rom = vec![0xEAu8; RAM_SIZE + 100];
    rom[RAM_SIZE] = 0x11;
    let file = temp_file(&rom);

    let image = loader::load_rom(file.path()).unwrap();
    assert_eq!(image.as_bytes().len(), RAM_SIZE);
    assert!(image.as_bytes().iter().all(|&b| b == 0xEA));
}

#[test]
fn test_load_rom_short_reports_counts() {
    let file = temp_file(&[0u8; 100]);
    let err = loader::load_rom(file.path()).unwrap_err();
    assert!(matches!(err, HarnessError::ShortRom { got: 100, needed: 4096 }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_load_rom_empty_file() {
    let file = temp_file(&[]);
    let err = loader::load_rom(file.path()).unwrap_err();
    assert!(matches!(err, HarnessError::ShortRom { got: 0, .. }));
}

#[test]
fn test_load_rom_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader::load_rom(&dir.path().join("nope.bin")).unwrap_err();
    assert!(matches!(err, HarnessError::RomRead { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_load_script() {
    let file = temp_file(b"10:0x20=01\n0:0x21=02\n");
    let events = loader::load_script(file.path()).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].due, 10);
}

#[test]
fn test_load_script_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader::load_script(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, HarnessError::ScriptRead { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_load_timeline_puts_extra_lines_first_among_ties() {
    let file = temp_file(b"5:0x30=aa\n0:0x31=bb\n");
    let extra = vec!["5:0x32=cc".to_string()];

    let timeline = loader::load_timeline(file.path(), &extra).unwrap();
    let addrs: Vec<u16> = timeline.events().iter().map(|e| e.address).collect();
    assert_eq!(addrs, vec![0x31, 0x32, 0x30]);
}

#[test]
fn test_rom_from_bytes() {
    assert!(loader::rom_from_bytes(&[0; RAM_SIZE]).is_ok());
    assert!(matches!(
        loader::rom_from_bytes(&[0; RAM_SIZE - 1]),
        Err(HarnessError::ShortRom { got: 4095, .. })
    ));
}
