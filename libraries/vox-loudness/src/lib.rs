//! Loudness measurement and normalization for Vox
//!
//! This crate provides:
//! - EBU R128 / ITU-R BS.1770-4 integrated loudness of mono signals
//! - Sample and true peak reporting for clipping diagnostics
//! - A file-level normalization engine applying a single linear gain
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Audio File  │ ──► │  Decode      │ ──► │ Silence guard │
//! └─────────────┘     └──────────────┘     └───────┬───────┘
//!                                                  ▼
//! ┌─────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ WAV bytes   │ ◄── │  Gain Apply  │ ◄── │ Meter (LUFS)  │
//! └─────────────┘     └──────────────┘     └───────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vox_core::TracingObserver;
//! use vox_loudness::{normalize_loudness, NormalizationConfig};
//!
//! let config = NormalizationConfig::with_target(-16.0);
//! let result = normalize_loudness(Path::new("/podcast/episode.flac"), &config, &TracingObserver);
//! println!("{}", result.message);
//! ```

#![forbid(unsafe_code)]

mod error;
mod meter;
mod normalizer;

pub use error::{LoudnessError, Result};
pub use meter::{analyze, linear_to_db, measure, LoudnessMeasurement, LoudnessReport};
pub use normalizer::{
    apply_gain, gain_for, normalize_loudness, normalize_signal, NormalizationConfig, Normalized,
    COMPLETE_MESSAGE, SILENT_INPUT_MESSAGE, UNMEASURABLE_MESSAGE,
};

/// EBU R128 broadcast reference level (-23 LUFS), the default target
pub const EBU_R128_BROADCAST_LUFS: f64 = -23.0;

/// Quietest target accepted at the application boundary
pub const MIN_TARGET_LUFS: f64 = -70.0;

/// Loudest target accepted at the application boundary
pub const MAX_TARGET_LUFS: f64 = 0.0;
