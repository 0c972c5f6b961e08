//! ROM and Script Loading.
//!
//! This module reads the harness inputs from disk. It performs:
//! 1. **ROM loading:** Reads exactly `RAM_SIZE` bytes into a fresh image; a shorter
//!    file is rejected with the byte counts, and trailing bytes are ignored.
//! 2. **Script loading:** Reads and parses a script file into events in file order.
//! 3. **Timeline assembly:** Merges extra event lines ahead of the file and sorts.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use crate::common::HarnessError;
use crate::common::constants::RAM_SIZE;
use crate::sim::script::{self, ScriptEvent};
use crate::sim::timeline::ScriptTimeline;
use crate::soc::memory::MemoryImage;

/// Loads a ROM file into a new memory image.
///
/// # Arguments
///
/// * `path` - Path to the ROM file.
///
/// # Returns
///
/// The image, or `RomRead` if the file cannot be read and `ShortRom` if it
/// holds fewer than `RAM_SIZE` bytes.
pub fn load_rom(path: &Path) -> Result<MemoryImage, HarnessError> {
    let rom_error = |source| HarnessError::RomRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(rom_error)?;

    let mut bytes = Vec::with_capacity(RAM_SIZE);
    let _ = file
        .take(RAM_SIZE as u64)
        .read_to_end(&mut bytes)
        .map_err(rom_error)?;

    rom_from_bytes(&bytes)
}

/// Builds a memory image from the first `RAM_SIZE` bytes of `bytes`.
pub fn rom_from_bytes(bytes: &[u8]) -> Result<MemoryImage, HarnessError> {
    let rom: &[u8; RAM_SIZE] = bytes
        .get(..RAM_SIZE)
        .and_then(|head| head.try_into().ok())
        .ok_or_else(|| HarnessError::ShortRom {
            got: bytes.len(),
            needed: RAM_SIZE,
        })?;
    Ok(MemoryImage::from_rom(rom))
}

/// Reads and parses a script file.
///
/// Invalid UTF-8 is replaced rather than rejected; the grammar only looks at
/// ASCII digits and separators.
pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>, HarnessError> {
    let bytes = fs::read(path).map_err(|source| HarnessError::ScriptRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(script::parse_script(&String::from_utf8_lossy(&bytes)))
}

/// Builds the timeline from extra event lines followed by the script file.
///
/// Extra lines come first so that they run before file events due at the same sample.
pub fn load_timeline(path: &Path, extra: &[String]) -> Result<ScriptTimeline, HarnessError> {
    let mut events: Vec<ScriptEvent> = extra
        .iter()
        .map(|line| ScriptEvent::parse_line(line))
        .collect();
    events.extend(load_script(path)?);

    let timeline = ScriptTimeline::new(events);
    tracing::info!("Read {} script entries", timeline.len());
    Ok(timeline)
}
