//! Error types for loudness measurement

use thiserror::Error;
use vox_core::ProcessingError;

/// Result type for loudness operations
pub type Result<T> = std::result::Result<T, LoudnessError>;

/// Errors that can occur while setting up or running the meter
#[derive(Error, Debug)]
pub enum LoudnessError {
    /// ebur128 could not build a meter for this sample rate
    #[error("Sample rate {0} Hz is not supported by the loudness meter")]
    UnsupportedSampleRate(u32),

    /// EBU R128 analysis error
    #[error("EBU R128 analysis failed: {0}")]
    AnalysisError(String),
}

impl From<ebur128::Error> for LoudnessError {
    fn from(err: ebur128::Error) -> Self {
        Self::AnalysisError(format!("{:?}", err))
    }
}

impl From<LoudnessError> for ProcessingError {
    fn from(err: LoudnessError) -> Self {
        match err {
            LoudnessError::UnsupportedSampleRate(_) => ProcessingError::invalid_config(err.to_string()),
            LoudnessError::AnalysisError(msg) => ProcessingError::external("ebur128", msg),
        }
    }
}
