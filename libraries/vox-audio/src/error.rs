/// Codec-specific errors
use thiserror::Error;
use vox_core::ProcessingError;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio codec error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Encoding error
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Symphonia error
    #[error("Symphonia error: {0}")]
    Symphonia(String),
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => Self::Io(e),
            other => Self::EncodeError(other.to_string()),
        }
    }
}

impl From<AudioError> for ProcessingError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::FileNotFound(path) => ProcessingError::InputNotFound(path.into()),
            AudioError::UnsupportedFormat(msg) => {
                ProcessingError::decode(format!("Unsupported format: {}", msg))
            }
            AudioError::DecodeError(msg) | AudioError::Symphonia(msg) => {
                ProcessingError::decode(msg)
            }
            AudioError::EncodeError(msg) => ProcessingError::encode(msg),
            AudioError::Io(e) => ProcessingError::Io(e),
        }
    }
}
