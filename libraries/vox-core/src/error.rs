/// Core error types for the Vox engines
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ProcessingError`
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Error raised inside an engine or collaborator before it reaches the
/// result boundary.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The input path did not exist when the call started
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Audio content could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Audio samples could not be encoded into the target container
    #[error("Encode error: {0}")]
    Encode(String),

    /// Engine parameters out of their valid domain
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An external tool (separation model, downloader) failed
    #[error("{tool} failed: {message}")]
    External {
        /// Tool name as shown to users
        tool: String,
        /// Diagnostic text, usually truncated stderr
        message: String,
    },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The four failure kinds callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Path did not exist at call time
    InputNotFound,
    /// Malformed or unsupported audio content
    DecodeError,
    /// Audio data the target format cannot represent
    EncodeError,
    /// Everything else
    UnexpectedError,
}

impl ProcessingError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an external tool error
    pub fn external(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::External {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Classify this error into the caller-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputNotFound(_) => ErrorKind::InputNotFound,
            Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::InputNotFound,
            Self::Decode(_) => ErrorKind::DecodeError,
            Self::Encode(_) => ErrorKind::EncodeError,
            Self::InvalidConfig(_) | Self::External { .. } | Self::Io(_) => {
                ErrorKind::UnexpectedError
            }
        }
    }
}
