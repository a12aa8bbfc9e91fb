/// Download service - yt-dlp wrapper extracting audio as WAV
use crate::services::separation::{truncate_chars, STDERR_LIMIT};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use vox_core::{ErrorKind, ProcessingError, ProcessingResult};

#[derive(Debug, Clone)]
pub struct DownloadService {
    ytdlp_path: PathBuf,
    output_dir: PathBuf,
}

impl DownloadService {
    pub fn new(ytdlp_path: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            ytdlp_path,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the yt-dlp command line for `url`
    pub fn command(&self, url: &str) -> Command {
        let template = self.output_dir.join("%(title)s.%(ext)s");

        let mut cmd = Command::new(&self.ytdlp_path);
        cmd.arg("-x")
            .arg("--no-playlist")
            .arg("--audio-format")
            .arg("wav")
            .arg("-o")
            .arg(template)
            .arg("--print")
            .arg("after_move:filepath")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Download the audio track of `url` into the output directory
    pub async fn download(&self, url: &str) -> ProcessingResult {
        tracing::info!("Downloading audio from {}", url);

        match self.run(url).await {
            Ok(result) => result,
            Err(err) => {
                let result = ProcessingResult::from_error("Download", &err);
                tracing::error!("{}", result.message);
                result
            }
        }
    }

    async fn run(&self, url: &str) -> Result<ProcessingResult, ProcessingError> {
        let output = self.command(url).output().await.map_err(|e| {
            ProcessingError::external(
                "yt-dlp",
                format!("failed to launch {}: {}", self.ytdlp_path.display(), e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessingError::external(
                "yt-dlp",
                truncate_chars(stderr.trim(), STDERR_LIMIT),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(path) = printed_path(&stdout) else {
            return Ok(ProcessingResult::failure(
                ErrorKind::InputNotFound,
                "Download error: yt-dlp did not report an output file",
            ));
        };

        if !path.is_file() {
            return Ok(ProcessingResult::failure(
                ErrorKind::InputNotFound,
                format!("Download error: downloaded file not found: {}", path.display()),
            ));
        }

        tracing::info!("Downloaded {}", path.display());
        let mut paths = BTreeMap::new();
        paths.insert("audio".to_string(), path);
        Ok(ProcessingResult::paths("Download complete!", paths))
    }
}

/// Last non-empty line printed by `--print after_move:filepath`
pub fn printed_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}
