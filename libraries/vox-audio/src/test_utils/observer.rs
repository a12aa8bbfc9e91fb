//! Observer that records engine diagnostics for assertions

use std::sync::Mutex;
use vox_core::EngineObserver;

/// Severity of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Collects every message an engine emits
#[derive(Debug, Default)]
pub struct RecordingObserver {
    entries: Mutex<Vec<(Level, String, String)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at `level`, in emission order
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(l, _, _)| *l == level)
                    .map(|(_, _, m)| m.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check whether any message at `level` contains `needle`
    pub fn saw(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: Level, engine: &str, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, engine.to_string(), message.to_string()));
        }
    }
}

impl EngineObserver for RecordingObserver {
    fn info(&self, engine: &str, message: &str) {
        self.push(Level::Info, engine, message);
    }

    fn warn(&self, engine: &str, message: &str) {
        self.push(Level::Warn, engine, message);
    }

    fn error(&self, engine: &str, message: &str) {
        self.push(Level::Error, engine, message);
    }
}
