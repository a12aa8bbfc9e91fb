/// API integration tests
/// Tests complete HTTP request/response cycles through the router
mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use common::{multipart_body, noisy_wav, staged_files, test_app, test_config, upload_request};
use tempfile::TempDir;
use tower::util::ServiceExt;
use vox_server::api::processing::MESSAGE_HEADER;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let app = test_app(test_config(&dir));

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["storage_ready"], true);
    assert_eq!(json["default_target_lufs"], -23.0);
    assert_eq!(json["tools"]["demucs_model"], "htdemucs");
    assert_eq!(json["tools"]["ytdlp"], "/nonexistent/vox-test-yt-dlp");
}

#[tokio::test]
async fn test_health_reports_missing_storage() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    std::fs::remove_dir_all(config.temp_dir()).unwrap();
    let app = test_app(config);

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["storage_ready"], false);
}

#[tokio::test]
async fn test_denoise_returns_wav_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let app = test_app(config.clone());
    let wav = noisy_wav();

    let response = app
        .oneshot(upload_request(
            "/api/denoise",
            multipart_body(Some(("my take.wav", &wav)), &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    assert_eq!(
        response.headers()[MESSAGE_HEADER],
        "Noise reduction complete!"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("my take_denoised.wav"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"RIFF"));
    assert_eq!(staged_files(&config), 0);
}

#[tokio::test]
async fn test_denoise_without_file_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = test_app(test_config(&dir));

    let response = app
        .oneshot(upload_request(
            "/api/denoise",
            multipart_body(None, &[("note", "no file here")]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Missing file");
}

#[tokio::test]
async fn test_denoise_requires_multipart() {
    let dir = TempDir::new().unwrap();
    let app = test_app(test_config(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/denoise")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_with_unsupported_extension_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let app = test_app(config.clone());
    let wav = noisy_wav();

    let response = app
        .oneshot(upload_request(
            "/api/normalize",
            multipart_body(Some(("lyrics.txt", &wav)), &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported audio format"));
    assert_eq!(staged_files(&config), 0);
}

#[tokio::test]
async fn test_undecodable_upload_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let app = test_app(config.clone());

    let response = app
        .oneshot(upload_request(
            "/api/denoise",
            multipart_body(Some(("broken.wav", b"not really audio")), &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error_kind"], "decode_error");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Noise reduction error:"));
    assert!(json["payload"].is_null());
    assert_eq!(staged_files(&config), 0);
}

#[tokio::test]
async fn test_normalize_with_target() {
    let dir = TempDir::new().unwrap();
    let app = test_app(test_config(&dir));
    let wav = noisy_wav();

    let response = app
        .oneshot(upload_request(
            "/api/normalize?target_lufs=-16",
            multipart_body(Some(("speech.wav", &wav)), &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[MESSAGE_HEADER],
        "Loudness normalization complete!"
    );
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("speech_normalized.wav"));
}

#[tokio::test]
async fn test_normalize_rejects_out_of_range_target() {
    let dir = TempDir::new().unwrap();
    let app = test_app(test_config(&dir));
    let wav = noisy_wav();

    for target in ["5", "-71", "NaN"] {
        let response = app
            .clone()
            .oneshot(upload_request(
                &format!("/api/normalize?target_lufs={target}"),
                multipart_body(Some(("speech.wav", &wav)), &[]),
            ))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "target {target} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_separate_reports_launch_failure() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let app = test_app(config.clone());
    let wav = noisy_wav();

    let response = app
        .oneshot(upload_request(
            "/api/separate",
            multipart_body(Some(("song.wav", &wav)), &[("model", "htdemucs")]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("Demucs failed"));
    assert_eq!(staged_files(&config), 0);
}

#[tokio::test]
async fn test_download_rejects_non_http_url() {
    let dir = TempDir::new().unwrap();
    let app = test_app(test_config(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/download")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"url": "ftp://example.com/a"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_reports_missing_tool() {
    let dir = TempDir::new().unwrap();
    let app = test_app(test_config(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/download")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"url": "https://example.com/watch?v=1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert!(json["message"].as_str().unwrap().contains("yt-dlp failed"));
}

#[tokio::test]
async fn test_upload_limit_is_enforced() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.server.max_upload_mb = 1;
    let app = test_app(config);
    let big = vec![0u8; 2 * 1024 * 1024];

    let response = app
        .oneshot(upload_request(
            "/api/denoise",
            multipart_body(Some(("big.wav", &big)), &[]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
