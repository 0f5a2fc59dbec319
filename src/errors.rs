//! Error types and log formatting
//!
//! Errors from collaborators are carried as `anyhow::Error`; `to_log_format`
//! turns one into a single string suitable for a log field.

use std::backtrace::BacktraceStatus;

/// Failures raised by the bundled clear-and-sync backend
#[derive(Debug, thiserror::Error)]
pub enum ClearHistoryError {
    #[error("Failed to delete call history from storage: {0}")]
    Storage(String),

    #[error("Failed to sync call history clear to linked devices: {0}")]
    Sync(String),

    #[error("Call history storage is unavailable")]
    Unavailable,
}

/// Render an error for logging: the full cause chain, then the backtrace if
/// one was captured
pub fn to_log_format(error: &anyhow::Error) -> String {
    let mut out = format!("{:#}", error);

    let backtrace = error.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        out.push('\n');
        out.push_str(&backtrace.to_string());
    }

    out
}
