//! # Unit Components
//!
//! This module mirrors the library source tree. Each submodule tests the
//! matching library module; end-to-end playback lives under `sim`.
