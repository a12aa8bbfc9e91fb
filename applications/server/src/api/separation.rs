/// Stem separation API routes
use crate::{
    error::{Result, ServerError},
    services::SeparationOptions,
    state::AppState,
    upload,
};
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use vox_core::ProcessingResult;

/// POST /api/separate
/// Upload an audio file (plus optional `model` and `stems` fields) and
/// receive the paths of the separated stems
pub async fn separate(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProcessingResult>> {
    let mut form = upload::parse_multipart(&headers, body).await?;
    let file = form.require_file()?;
    let options = SeparationOptions {
        model: form.field("model").map(str::to_string),
        stems: form.field("stems").map(str::to_string),
    };

    let staged = upload::stage_upload(&app_state.config.temp_dir(), &file)?;
    let result = app_state.separation.separate(staged.path(), &options).await;
    drop(staged);

    if result.success {
        Ok(Json(result))
    } else {
        Err(ServerError::Processing(result))
    }
}
