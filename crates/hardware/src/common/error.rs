//! Fatal harness errors.
//!
//! This module defines the errors that end a run before (or after) the emulation loop. It provides:
//! 1. **Startup Failures:** Unreadable or short ROM images, unreadable scripts, bad config or pokes.
//! 2. **I/O Failures:** Errors writing the raw sample stream or the RAM dump.
//! 3. **Exit Codes:** A stable process exit code for each failure class.
//!
//! The script termination sentinel is not an error and never appears here; see
//! [`Stop`](super::signal::Stop).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The ROM file could not be opened or read at all.
    #[error("romfile: could not read '{path}': {source}")]
    RomRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The ROM file held fewer bytes than the memory image requires.
    #[error("romfile: not enough bytes read; got {got}, needed {needed}")]
    ShortRom {
        /// Bytes actually available.
        got: usize,
        /// Bytes required (the RAM size).
        needed: usize,
    },

    /// The script file could not be opened or read.
    #[error("scriptfile: could not read '{path}': {source}")]
    ScriptRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be read.
    #[error("config: could not read '{path}': {source}")]
    ConfigRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configuration file was not valid JSON for [`Config`](crate::Config).
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    /// A `--poke` argument did not have the `ADDR=HEX` shape.
    #[error("poke: expected ADDR=HEXBYTES, got '{0}'")]
    Poke(String),

    /// Writing the sample stream, or the RAM dump, failed.
    #[error("output: {0}")]
    Output(#[from] io::Error),
}

impl HarnessError {
    /// Returns the process exit code for this error.
    ///
    /// ROM problems exit with 2 (an unopenable ROM is a zero-byte short read),
    /// output failures with 3, and every other startup failure with 1.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::RomRead { .. } | Self::ShortRom { .. } => 2,
            Self::Output(_) => 3,
            Self::ScriptRead { .. } | Self::ConfigRead { .. } | Self::Config(_) | Self::Poke(_) => 1,
        }
    }
}
