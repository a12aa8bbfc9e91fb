/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vox_audio::WavSampleFormat;
use vox_denoise::{NoiseReductionConfig, StftConfig};
use vox_loudness::{NormalizationConfig, MAX_TARGET_LUFS, MIN_TARGET_LUFS};

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "vox.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_paths")]
    pub paths: PathSettings,

    #[serde(default = "default_processing")]
    pub processing: ProcessingSettings,

    #[serde(default = "default_separation")]
    pub separation: SeparationSettings,

    #[serde(default = "default_download")]
    pub download: DownloadSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathSettings {
    /// Root for every relative path below
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    #[serde(default = "default_separation_output_dir")]
    pub separation_output_dir: PathBuf,

    #[serde(default = "default_download_output_dir")]
    pub download_output_dir: PathBuf,

    /// Where uploads are staged while an engine runs
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessingSettings {
    #[serde(default = "default_target_lufs")]
    pub target_lufs: f64,

    #[serde(default = "default_noise_duration_sec")]
    pub noise_duration_sec: f64,

    #[serde(default = "default_noise_floor")]
    pub noise_floor: f32,

    #[serde(default = "default_n_fft")]
    pub n_fft: usize,

    #[serde(default = "default_hop_length")]
    pub hop_length: usize,

    #[serde(default)]
    pub output_format: WavSampleFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeparationSettings {
    #[serde(default = "default_python")]
    pub python: PathBuf,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_stems")]
    pub stems: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadSettings {
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from `path`, or `vox.toml` when none is given,
    /// then apply `VOX_` environment overrides
    ///
    /// An explicit file must exist; the default `vox.toml` is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables, e.g. VOX_SERVER__PORT=9000
        settings = settings.add_source(
            config::Environment::with_prefix("VOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_target_lufs(self.processing.target_lufs)
            .map_err(|msg| ServerError::Config(format!("processing.target_lufs: {}", msg)))?;

        if self.server.max_upload_mb == 0 {
            return Err(ServerError::Config(
                "server.max_upload_mb must be at least 1".to_string(),
            ));
        }

        self.noise_reduction()
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        if self.separation.model.trim().is_empty() {
            return Err(ServerError::Config(
                "separation.model must not be empty".to_string(),
            ));
        }

        if self.separation.stems.trim().is_empty() {
            return Err(ServerError::Config(
                "separation.stems must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve a configured path against `paths.base_dir`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.paths.base_dir.join(path)
        }
    }

    pub fn separation_output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.separation_output_dir)
    }

    pub fn download_output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.download_output_dir)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.resolve(&self.paths.temp_dir)
    }

    /// Create the output and temp directories
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            self.separation_output_dir(),
            self.download_output_dir(),
            self.temp_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Noise reduction parameters for the engine
    pub fn noise_reduction(&self) -> NoiseReductionConfig {
        NoiseReductionConfig {
            noise_duration_sec: self.processing.noise_duration_sec,
            noise_floor: self.processing.noise_floor,
            stft: StftConfig {
                n_fft: self.processing.n_fft,
                hop_length: self.processing.hop_length,
            },
            output_format: self.processing.output_format,
        }
    }

    /// Normalization parameters, with an optional per-request target
    pub fn normalization(&self, target_lufs: Option<f64>) -> NormalizationConfig {
        NormalizationConfig {
            target_lufs: target_lufs.unwrap_or(self.processing.target_lufs),
            output_format: self.processing.output_format,
        }
    }
}

/// Check a loudness target against the range accepted at the boundary
pub fn validate_target_lufs(target_lufs: f64) -> std::result::Result<(), String> {
    if !target_lufs.is_finite() || !(MIN_TARGET_LUFS..=MAX_TARGET_LUFS).contains(&target_lufs) {
        return Err(format!(
            "target_lufs {} must be between {} and {} LUFS",
            target_lufs, MIN_TARGET_LUFS, MAX_TARGET_LUFS
        ));
    }
    Ok(())
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        max_upload_mb: default_max_upload_mb(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_upload_mb() -> usize {
    200
}

fn default_paths() -> PathSettings {
    PathSettings {
        base_dir: default_base_dir(),
        separation_output_dir: default_separation_output_dir(),
        download_output_dir: default_download_output_dir(),
        temp_dir: default_temp_dir(),
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_separation_output_dir() -> PathBuf {
    PathBuf::from("output_demucs")
}

fn default_download_output_dir() -> PathBuf {
    PathBuf::from("output_youtube")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from(".temp_audio")
}

fn default_processing() -> ProcessingSettings {
    ProcessingSettings {
        target_lufs: default_target_lufs(),
        noise_duration_sec: default_noise_duration_sec(),
        noise_floor: default_noise_floor(),
        n_fft: default_n_fft(),
        hop_length: default_hop_length(),
        output_format: WavSampleFormat::default(),
    }
}

fn default_target_lufs() -> f64 {
    vox_loudness::EBU_R128_BROADCAST_LUFS
}

fn default_noise_duration_sec() -> f64 {
    vox_denoise::DEFAULT_NOISE_DURATION_SEC
}

fn default_noise_floor() -> f32 {
    vox_denoise::DEFAULT_NOISE_FLOOR
}

fn default_n_fft() -> usize {
    vox_denoise::DEFAULT_N_FFT
}

fn default_hop_length() -> usize {
    vox_denoise::DEFAULT_HOP_LENGTH
}

fn default_separation() -> SeparationSettings {
    SeparationSettings {
        python: default_python(),
        model: default_model(),
        stems: default_stems(),
    }
}

fn default_python() -> PathBuf {
    PathBuf::from("python3")
}

fn default_model() -> String {
    "htdemucs".to_string()
}

fn default_stems() -> String {
    "vocals".to_string()
}

fn default_download() -> DownloadSettings {
    DownloadSettings {
        ytdlp_path: default_ytdlp_path(),
    }
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            paths: default_paths(),
            processing: default_processing(),
            separation: default_separation(),
            download: default_download(),
        }
    }
}
