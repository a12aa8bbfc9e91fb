/// Shared application state
use crate::config::ServerConfig;
use crate::services::{DownloadService, SeparationService};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub separation: Arc<SeparationService>,
    pub download: Arc<DownloadService>,
}

impl AppState {
    /// Build the services from configuration
    pub fn new(config: ServerConfig) -> Self {
        let separation = SeparationService::new(
            config.separation.python.clone(),
            config.separation.model.clone(),
            config.separation.stems.clone(),
            config.separation_output_dir(),
        );
        let download = DownloadService::new(
            config.download.ytdlp_path.clone(),
            config.download_output_dir(),
        );

        Self {
            config: Arc::new(config),
            separation: Arc::new(separation),
            download: Arc::new(download),
        }
    }
}
