/// Upload handling: multipart parsing, filename sanitising and temp staging
use crate::error::{Result, ServerError};
use axum::http::{header, HeaderMap};
use bytes::Bytes;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use vox_audio::SymphoniaDecoder;

/// Name used when sanitising leaves nothing usable
pub const FALLBACK_FILENAME: &str = "processed_audio_name";

const FORBIDDEN_CHARS: [char; 9] = ['|', ':', '"', '*', '?', '<', '>', '/', '\\'];

/// Replace characters that are unsafe in file names with `_`
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Stem of a sanitised upload name, used to name processed downloads
pub fn output_stem(filename: &str) -> String {
    Path::new(&sanitize_filename(filename))
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_FILENAME)
        .to_string()
}

/// File part of a multipart upload plus any plain text fields
#[derive(Debug, Default)]
pub struct MultipartUpload {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

#[derive(Debug)]
pub struct UploadedFile {
    /// Sanitised client filename
    pub filename: String,
    pub data: Bytes,
}

impl MultipartUpload {
    /// Take the `file` part or fail with 400
    pub fn require_file(&mut self) -> Result<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| ServerError::BadRequest("Missing file".to_string()))
    }

    /// Non-empty text field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Parse a buffered `multipart/form-data` body
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<MultipartUpload> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| ServerError::BadRequest(format!("Missing boundary: {}", e)))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut upload = MultipartUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let filename = sanitize_filename(field.file_name().unwrap_or(""));
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?;
            upload.file = Some(UploadedFile { filename, data });
        } else {
            let value = field.text().await.map_err(|e| {
                ServerError::BadRequest(format!("Failed to read field {}: {}", name, e))
            })?;
            upload.fields.insert(name, value);
        }
    }

    Ok(upload)
}

/// Write an upload into `temp_dir`; the file is removed when the handle drops
///
/// The sanitised extension is kept as the suffix so the decoder can use it
/// as a format hint. Names without a decodable audio extension are a 400.
pub fn stage_upload(temp_dir: &Path, upload: &UploadedFile) -> Result<NamedTempFile> {
    if !SymphoniaDecoder::new().supports_format(Path::new(&upload.filename)) {
        return Err(ServerError::BadRequest(format!(
            "Unsupported audio format: {}",
            upload.filename
        )));
    }

    let suffix = Path::new(&upload.filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix("upload_")
        .suffix(&suffix)
        .tempfile_in(temp_dir)?;
    file.write_all(&upload.data)?;
    file.flush()?;
    Ok(file)
}

/// Remove leftover files from `temp_dir`, returning how many were deleted
pub fn clean_temp_dir(temp_dir: &Path) -> std::io::Result<usize> {
    if !temp_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in std::fs::read_dir(temp_dir)? {
        let path: PathBuf = entry?.path();
        if path.is_file() {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}
