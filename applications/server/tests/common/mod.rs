//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{body::Body, http::Request, Router};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use vox_audio::test_utils::signals::{generate_sine_wave, generate_white_noise, mix};
use vox_audio::{encode_wav, WavSampleFormat};
use vox_core::{AudioSignal, SampleRate};
use vox_server::{router, AppState, ServerConfig};

pub const BOUNDARY: &str = "vox-test-boundary";

/// Config rooted in `dir` with directories created and tools pointed at
/// paths that do not exist
pub fn test_config(dir: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.paths.base_dir = dir.path().to_path_buf();
    config.separation.python = PathBuf::from("/nonexistent/vox-test-python");
    config.download.ytdlp_path = PathBuf::from("/nonexistent/vox-test-yt-dlp");
    config.ensure_dirs().unwrap();
    config
}

pub fn test_app(config: ServerConfig) -> Router {
    router(AppState::new(config))
}

/// Two seconds of noise with a tone entering halfway, as float WAV bytes
pub fn noisy_wav() -> Vec<u8> {
    let rate = 16_000;
    let noise = generate_white_noise(rate, 2.0, 0.05, 7);
    let mut tone = vec![0.0; rate as usize];
    tone.extend(generate_sine_wave(440.0, rate, 1.0, 0.4));
    let signal = AudioSignal::new(mix(&noise, &tone), SampleRate::new(rate));
    encode_wav(&signal, WavSampleFormat::Float32).unwrap()
}

/// Build a `multipart/form-data` body with an optional `file` part
pub fn multipart_body(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        write!(
            body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .unwrap();
    }
    if let Some((filename, data)) = file {
        write!(
            body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .unwrap();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    write!(body, "--{BOUNDARY}--\r\n").unwrap();
    body
}

pub fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Number of entries left in the upload staging directory
pub fn staged_files(config: &ServerConfig) -> usize {
    std::fs::read_dir(config.temp_dir()).unwrap().count()
}

/// Write an executable shell script (unix only)
#[cfg(unix)]
pub fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
