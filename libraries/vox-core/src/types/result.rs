/// Uniform result envelope returned by every engine and collaborator
use crate::error::{ErrorKind, ProcessingError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Data carried by a successful result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    /// Encoded audio container bytes; serialized as their length only
    #[serde(serialize_with = "serialize_byte_len", skip_deserializing)]
    AudioBytes(Vec<u8>),
    /// Named output files, e.g. separated stems
    Paths(BTreeMap<String, PathBuf>),
}

/// Outcome of one engine or collaborator invocation
///
/// Callers branch on `success` and read `message` for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Whether the operation produced its intended output
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Output data, absent on failure
    pub payload: Option<Payload>,
    /// Failure classification, absent on success
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<ErrorKind>,
}

impl ProcessingResult {
    /// Successful result carrying encoded audio
    pub fn audio(message: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(Payload::AudioBytes(bytes)),
            error_kind: None,
        }
    }

    /// Successful result carrying a path mapping
    pub fn paths(message: impl Into<String>, paths: BTreeMap<String, PathBuf>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(Payload::Paths(paths)),
            error_kind: None,
        }
    }

    /// Failed result with no payload
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
            error_kind: Some(kind),
        }
    }

    /// Failed result built from an error, prefixed with the operation name
    /// unless the error already names the missing input.
    pub fn from_error(operation: &str, err: &ProcessingError) -> Self {
        let kind = err.kind();
        let message = match kind {
            ErrorKind::InputNotFound => err.to_string(),
            _ => format!("{} error: {}", operation, err),
        };
        Self::failure(kind, message)
    }

    /// Encoded audio bytes, if this result carries them
    pub fn audio_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Some(Payload::AudioBytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Path mapping, if this result carries one
    pub fn output_paths(&self) -> Option<&BTreeMap<String, PathBuf>> {
        match &self.payload {
            Some(Payload::Paths(paths)) => Some(paths),
            _ => None,
        }
    }
}

fn serialize_byte_len<S: serde::Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(bytes.len() as u64)
}
