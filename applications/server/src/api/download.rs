/// Audio download API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use serde::Deserialize;
use vox_core::ProcessingResult;

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
}

/// POST /api/download
/// Fetch the audio track of a video URL as WAV
pub async fn download(
    State(app_state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> Result<Json<ProcessingResult>> {
    let url = request.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ServerError::BadRequest(
            "url must be an http(s) URL".to_string(),
        ));
    }

    let result = app_state.download.download(url).await;

    if result.success {
        Ok(Json(result))
    } else {
        Err(ServerError::Processing(result))
    }
}
