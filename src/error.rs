//! Error type shared by every enhancement routine.
//!
//! Nothing here is fatal to the page. Storage errors are absorbed by the
//! preference store, DOM errors abort the current init sequence and are logged
//! by the lifecycle controller.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("dom operation failed: {op}: {detail}")]
    Dom { op: &'static str, detail: String },
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
}

impl EnhanceError {
    /// Build a [`EnhanceError::Dom`] for the named operation.
    pub fn dom(op: &'static str, detail: impl Into<String>) -> Self {
        Self::Dom { op, detail: detail.into() }
    }
}

/// Where an uncaught page error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UncaughtKind {
    /// A synchronous `error` event on the window.
    Error,
    /// An `unhandledrejection` event.
    Rejection,
}

/// An error that escaped every handler on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct UncaughtError {
    pub kind: UncaughtKind,
    pub message: String,
    pub source: Option<String>,
    pub line: Option<u32>,
}

impl UncaughtError {
    /// Render a single log line for this error.
    #[must_use]
    pub fn describe(&self) -> String {
        let label = match self.kind {
            UncaughtKind::Error => "uncaught error",
            UncaughtKind::Rejection => "unhandled rejection",
        };
        match (&self.source, self.line) {
            (Some(source), Some(line)) => format!("{label}: {} ({source}:{line})", self.message),
            (Some(source), None) => format!("{label}: {} ({source})", self.message),
            _ => format!("{label}: {}", self.message),
        }
    }
}

/// Page-wide fallback: log an uncaught error for diagnostics.
///
/// Never alters control flow and never suppresses the browser's own report.
pub fn report_uncaught(err: &UncaughtError) {
    log::error!("{}", err.describe());
}
