/// Stem separation service - Demucs subprocess wrapper
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use vox_core::{ProcessingError, ProcessingResult};

/// Characters of stderr kept in failure messages
pub const STDERR_LIMIT: usize = 500;

/// Demucs output file name and the result key it maps to
const STEM_FILES: [(&str, &str); 2] = [("vocals.wav", "vocals"), ("no_vocals.wav", "other")];

/// Per-request overrides of the configured model and stem selector
#[derive(Debug, Clone, Default)]
pub struct SeparationOptions {
    pub model: Option<String>,
    pub stems: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SeparationService {
    python: PathBuf,
    model: String,
    stems: String,
    output_dir: PathBuf,
}

impl SeparationService {
    pub fn new(python: PathBuf, model: String, stems: String, output_dir: PathBuf) -> Self {
        Self {
            python,
            model,
            stems,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the Demucs command line for `input`
    pub fn command(&self, input: &Path, options: &SeparationOptions) -> Command {
        let model = options.model.as_deref().unwrap_or(&self.model);
        let stems = options.stems.as_deref().unwrap_or(&self.stems);
        let stem_flag = if stems == "vocals" {
            "--two-stems"
        } else {
            "--stems"
        };

        let mut cmd = Command::new(&self.python);
        cmd.arg("-m")
            .arg("demucs")
            .arg(stem_flag)
            .arg(stems)
            .arg("--out")
            .arg(&self.output_dir)
            .arg("-n")
            .arg(model)
            .arg(input)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Separate `input` into stems and report the files Demucs wrote
    pub async fn separate(&self, input: &Path, options: &SeparationOptions) -> ProcessingResult {
        tracing::info!("Starting Demucs separation for {}", input.display());

        match self.run(input, options).await {
            Ok(result) => result,
            Err(err) => {
                let result = ProcessingResult::from_error("Separation", &err);
                tracing::error!("{}", result.message);
                result
            }
        }
    }

    async fn run(
        &self,
        input: &Path,
        options: &SeparationOptions,
    ) -> Result<ProcessingResult, ProcessingError> {
        if !input.exists() {
            return Err(ProcessingError::InputNotFound(input.to_path_buf()));
        }

        let output = self.command(input, options).output().await.map_err(|e| {
            ProcessingError::external(
                "Demucs",
                format!("failed to launch {}: {}", self.python.display(), e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessingError::external(
                "Demucs",
                truncate_chars(stderr.trim(), STDERR_LIMIT),
            ));
        }

        let model = options.model.as_deref().unwrap_or(&self.model);
        let expected_dir = expected_output_dir(&self.output_dir, model, input);
        let stems = discover_outputs(&expected_dir);

        if stems.is_empty() {
            return Err(ProcessingError::external(
                "Demucs",
                format!(
                    "no output files found in expected location: {}",
                    expected_dir.display()
                ),
            ));
        }

        if stems.len() < STEM_FILES.len() {
            tracing::warn!(
                "Demucs produced {} of {} expected stems in {}",
                stems.len(),
                STEM_FILES.len(),
                expected_dir.display()
            );
        }

        tracing::info!("Demucs separation finished: {:?}", stems.keys());
        Ok(ProcessingResult::paths("Separation complete!", stems))
    }
}

/// Directory Demucs writes into: `<output_dir>/<model>/<input stem>`
pub fn expected_output_dir(output_dir: &Path, model: &str, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(model).join(stem)
}

/// Map the stem files present in `dir` to their result keys
pub fn discover_outputs(dir: &Path) -> BTreeMap<String, PathBuf> {
    STEM_FILES
        .iter()
        .map(|(file, key)| (*key, dir.join(file)))
        .filter(|(_, path)| path.is_file())
        .map(|(key, path)| (key.to_string(), path))
        .collect()
}

/// First `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
