//! Observability sink passed into engine calls
//!
//! Engines never reach for a process-wide logger. Each call receives an
//! `EngineObserver`, so hosts decide where diagnostics go: `TracingObserver`
//! forwards to `tracing`, `NullObserver` drops everything, and tests can
//! record messages.

/// Receives diagnostics emitted by an engine invocation.
pub trait EngineObserver {
    /// Progress and completion messages
    fn info(&self, engine: &str, message: &str);

    /// Degraded-but-successful paths (short input, silent profile, clipping)
    fn warn(&self, engine: &str, message: &str);

    /// Failures converted into an unsuccessful result
    fn error(&self, engine: &str, message: &str);
}

/// Observer that emits `tracing` events with an `engine` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn info(&self, engine: &str, message: &str) {
        tracing::info!(engine, "{}", message);
    }

    fn warn(&self, engine: &str, message: &str) {
        tracing::warn!(engine, "{}", message);
    }

    fn error(&self, engine: &str, message: &str) {
        tracing::error!(engine, "{}", message);
    }
}

/// Observer that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EngineObserver for NullObserver {
    fn info(&self, _engine: &str, _message: &str) {}

    fn warn(&self, _engine: &str, _message: &str) {}

    fn error(&self, _engine: &str, _message: &str) {}
}

impl<T: EngineObserver + ?Sized> EngineObserver for &T {
    fn info(&self, engine: &str, message: &str) {
        (**self).info(engine, message);
    }

    fn warn(&self, engine: &str, message: &str) {
        (**self).warn(engine, message);
    }

    fn error(&self, engine: &str, message: &str) {
        (**self).error(engine, message);
    }
}
