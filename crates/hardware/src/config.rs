//! Configuration system for the playback harness.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline values for the batch budget and logging.
//! 2. **Structures:** Hierarchical config for general options and run limits.
//! 3. **Loading:** JSON deserialization from a file or string.
//!
//! The CLI starts from `Config::default()` and overrides individual fields from flags.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::HarnessError;
use crate::common::constants::{DEFAULT_BATCH_STEPS, SAMPLE_RATE_HZ};

/// Default configuration constants.
mod defaults {
    use super::DEFAULT_BATCH_STEPS;

    /// Instructions per `run_batch` call.
    ///
    /// Bounds how long a single call into the CPU may run before the driver
    /// gets to check the wait state again.
    pub const BATCH_STEPS: u32 = DEFAULT_BATCH_STEPS;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use acpsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "log_events": true },
///     "run": { "batch_steps": 1000, "max_samples": 44192 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.log_events);
/// assert_eq!(config.run.batch_steps, 1000);
/// assert_eq!(config.run.max_samples, Some(44192));
/// assert_eq!(config.run.max_instructions, None);
/// assert_eq!(config.run.max_cycles, None);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    /// General options
    #[serde(default)]
    pub general: GeneralConfig,
    /// Batch budget and run limits
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// Missing sections and fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or a `ConfigRead`/`Config` error.
    pub fn from_json_file(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// General options.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Log every replayed script event at info level instead of debug
    #[serde(default)]
    pub log_events: bool,
}

/// Batch budget and optional run limits.
///
/// With every limit unset the run only ends when the script sentinel fires.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Maximum instructions per `run_batch` call
    #[serde(default = "RunConfig::default_batch_steps")]
    pub batch_steps: u32,

    /// Stop after this many instructions in total
    #[serde(default)]
    pub max_instructions: Option<u64>,

    /// Stop at the first batch boundary at or past this many cycles
    #[serde(default)]
    pub max_cycles: Option<u64>,

    /// Stop once this many samples have been emitted
    #[serde(default)]
    pub max_samples: Option<u64>,

    /// Stop once this much audio has been emitted, in seconds at 44192 Hz
    #[serde(default)]
    pub max_seconds: Option<f64>,
}

impl RunConfig {
    /// Returns the default batch budget.
    const fn default_batch_steps() -> u32 {
        defaults::BATCH_STEPS
    }

    /// Combined sample budget from `max_samples` and `max_seconds`.
    ///
    /// A duration becomes the smallest sample count that reaches it; negative
    /// or NaN durations allow no samples. The tighter of the two limits wins.
    pub fn sample_budget(&self) -> Option<u64> {
        let from_seconds = self
            .max_seconds
            .map(|secs| (secs.max(0.0) * f64::from(SAMPLE_RATE_HZ)).ceil() as u64);
        match (self.max_samples, from_seconds) {
            (Some(samples), Some(seconds)) => Some(samples.min(seconds)),
            (samples, seconds) => samples.or(seconds),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_steps: defaults::BATCH_STEPS,
            max_instructions: None,
            max_cycles: None,
            max_samples: None,
            max_seconds: None,
        }
    }
}
