//! Adaptive spectral noise reduction for Vox
//!
//! This crate provides:
//! - A centered short-time Fourier transform and its overlap-add inverse
//! - Per-bin median noise profiles estimated from the opening of a recording
//! - Spectral subtraction with a configurable over-subtraction floor
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vox_core::TracingObserver;
//! use vox_denoise::{reduce_noise, NoiseReductionConfig};
//!
//! let result = reduce_noise(
//!     Path::new("/recordings/interview.mp3"),
//!     &NoiseReductionConfig::default(),
//!     &TracingObserver,
//! );
//!
//! if let Some(wav) = result.audio_bytes() {
//!     std::fs::write("interview_clean.wav", wav).ok();
//! }
//! println!("{}", result.message);
//! ```

#![forbid(unsafe_code)]

mod engine;
mod spectral;
mod stft;

pub use engine::{
    denoise_signal, reduce_noise, Denoised, NoiseReductionConfig, COMPLETE_MESSAGE,
    DEFAULT_NOISE_DURATION_SEC, DEFAULT_NOISE_FLOOR, SILENT_PROFILE_MESSAGE,
};
pub use spectral::{median, subtract_noise, NoiseProfile, SpectralFrame};
pub use stft::{hann_window, Spectrogram, Stft, StftConfig, DEFAULT_HOP_LENGTH, DEFAULT_N_FFT};
