//! Vox Core
//!
//! Platform-agnostic core types, error handling and observability hooks
//! shared by the Vox audio engines.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `AudioSignal`, `SampleRate`, `ProcessingResult`
//! - **Error Handling**: `ProcessingError`, its `ErrorKind` taxonomy and `Result`
//! - **Observability**: the `EngineObserver` sink passed into every engine call
//!
//! # Example
//!
//! ```rust
//! use vox_core::{AudioSignal, ProcessingResult, SampleRate};
//!
//! let signal = AudioSignal::new(vec![0.0; 48_000], SampleRate::new(48_000));
//! assert!((signal.duration_secs() - 1.0).abs() < f64::EPSILON);
//!
//! let result = ProcessingResult::audio("Done", vec![1, 2, 3]);
//! assert!(result.success);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod observer;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, ProcessingError, Result};
pub use observer::{EngineObserver, NullObserver, TracingObserver};
pub use types::{peak, AudioSignal, Payload, ProcessingResult, SampleRate};

/// Peak amplitude below which a signal is treated as silent.
pub const SILENCE_THRESHOLD: f32 = 1e-5;
