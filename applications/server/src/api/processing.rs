/// Noise reduction and loudness normalization API routes
use crate::{
    config::validate_target_lufs,
    error::{Result, ServerError},
    state::AppState,
    upload,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use vox_core::{Payload, ProcessingResult, TracingObserver};

/// Response header carrying the engine's result message
pub const MESSAGE_HEADER: &str = "x-vox-message";

#[derive(Debug, Deserialize)]
pub struct NormalizeQuery {
    #[serde(default)]
    pub target_lufs: Option<f64>,
}

/// POST /api/denoise
/// Upload an audio file, receive the denoised WAV
pub async fn denoise(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let mut form = upload::parse_multipart(&headers, body).await?;
    let file = form.require_file()?;
    let staged = upload::stage_upload(&app_state.config.temp_dir(), &file)?;
    let config = app_state.config.noise_reduction();

    tracing::info!("Denoising upload {}", file.filename);

    // The staged file lives until the engine returns, then is removed
    let result = tokio::task::spawn_blocking(move || {
        vox_denoise::reduce_noise(staged.path(), &config, &TracingObserver)
    })
    .await?;

    audio_response(
        result,
        &format!("{}_denoised.wav", upload::output_stem(&file.filename)),
    )
}

/// POST /api/normalize?target_lufs=-16
/// Upload an audio file, receive the loudness-normalized WAV
pub async fn normalize(
    State(app_state): State<AppState>,
    Query(query): Query<NormalizeQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    if let Some(target) = query.target_lufs {
        validate_target_lufs(target).map_err(ServerError::BadRequest)?;
    }

    let mut form = upload::parse_multipart(&headers, body).await?;
    let file = form.require_file()?;
    let staged = upload::stage_upload(&app_state.config.temp_dir(), &file)?;
    let config = app_state.config.normalization(query.target_lufs);

    tracing::info!(
        "Normalizing upload {} to {} LUFS",
        file.filename,
        config.target_lufs
    );

    let result = tokio::task::spawn_blocking(move || {
        vox_loudness::normalize_loudness(staged.path(), &config, &TracingObserver)
    })
    .await?;

    audio_response(
        result,
        &format!("{}_normalized.wav", upload::output_stem(&file.filename)),
    )
}

/// Turn an engine result into a WAV download or a failure response
fn audio_response(result: ProcessingResult, filename: &str) -> Result<Response> {
    if !result.success {
        return Err(ServerError::Processing(result));
    }

    let message = HeaderValue::from_str(&result.message)
        .map_err(|e| ServerError::Internal(format!("Invalid result message: {}", e)))?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let Some(Payload::AudioBytes(bytes)) = result.payload else {
        return Err(ServerError::Internal(
            "Engine reported success without audio".to_string(),
        ));
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/wav")),
            (header::CONTENT_DISPOSITION, disposition),
            (HeaderName::from_static(MESSAGE_HEADER), message),
        ],
        bytes,
    )
        .into_response())
}
