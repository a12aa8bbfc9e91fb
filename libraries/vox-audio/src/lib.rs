//! Vox Audio
//!
//! The codec adapter shared by every Vox engine.
//!
//! This crate provides:
//! - Audio decoding via Symphonia (WAV, MP3, FLAC, OGG/Vorbis, M4A/AAC),
//!   downmixed to mono at the native sample rate
//! - In-memory WAV encoding via hound (32-bit float or 16-bit PCM)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vox_audio::{decode, encode_wav, WavSampleFormat};
//! use vox_core::TracingObserver;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signal = decode(Path::new("/music/take.wav"), &TracingObserver)?;
//! println!("Decoded {} samples at {} Hz", signal.len(), signal.sample_rate().as_hz());
//!
//! let wav = encode_wav(&signal, WavSampleFormat::Float32)?;
//! assert!(wav.starts_with(b"RIFF"));
//! # Ok(())
//! # }
//! ```

mod decoder;
mod encoder;
mod error;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use decoder::{decode, SymphoniaDecoder};
pub use encoder::{encode_wav, WavSampleFormat};
pub use error::{AudioError, Result};
pub use vox_core::peak;
