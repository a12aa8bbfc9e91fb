//! Vox Server Library
//!
//! HTTP surface over the Vox engines: noise reduction and loudness
//! normalization of uploaded audio, plus Demucs stem separation and
//! yt-dlp audio download as external collaborators.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod upload;

// Re-export commonly used types for convenience
pub use api::router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{DownloadService, SeparationOptions, SeparationService};
pub use state::AppState;
