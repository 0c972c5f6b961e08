//! Playback setup and execution.
//!
//! Provides script parsing and the replay timeline, ROM and script loading,
//! and the driver that runs a processor until the script or a limit stops it.

/// Batch driver and run report.
pub mod driver;

/// ROM, script and poke loading.
pub mod loader;

/// Script line grammar and payload decoding.
pub mod script;

/// Sorted events and the replay cursor.
pub mod timeline;
