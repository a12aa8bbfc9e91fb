//! Test utilities for audio testing
//!
//! Provides deterministic test signals, WAV fixture helpers and a
//! recording observer for verifying the engines end to end.

pub mod fixtures;
pub mod observer;
pub mod signals;

pub use fixtures::*;
pub use observer::{Level, RecordingObserver};
pub use signals::*;
