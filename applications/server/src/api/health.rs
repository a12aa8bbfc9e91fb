/// Health check API routes
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Output and temp directories exist
    pub storage_ready: bool,
    pub default_target_lufs: f64,
    pub tools: ToolsInfo,
}

/// External tools the collaborators shell out to
#[derive(Debug, Serialize)]
pub struct ToolsInfo {
    pub demucs_python: PathBuf,
    pub demucs_model: String,
    pub ytdlp: PathBuf,
}

/// GET /api/health - Health check endpoint
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let config = &app_state.config;
    let storage_ready = [
        config.separation_output_dir(),
        config.download_output_dir(),
        config.temp_dir(),
    ]
    .iter()
    .all(|dir| dir.is_dir());

    Json(HealthResponse {
        status: if storage_ready { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_ready,
        default_target_lufs: config.processing.target_lufs,
        tools: ToolsInfo {
            demucs_python: config.separation.python.clone(),
            demucs_model: config.separation.model.clone(),
            ytdlp: config.download.ytdlp_path.clone(),
        },
    })
}
