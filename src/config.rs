//! Runtime configuration
//!
//! Loaded from a TOML file; every field has a default so a missing or empty
//! file is valid.
//!
//! ```toml
//! [logging]
//! filter = "call_history=debug,info"
//! ansi = false
//!
//! [sync]
//! fail_clear = false
//! fail_sync = false
//! latency_ms = 250
//! ```

use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    pub filter: String,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: true,
        }
    }
}

/// Knobs for the local clear-and-sync backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Make every clear fail with `Unavailable`
    pub fail_clear: bool,
    /// Delete locally but fail to notify linked devices
    pub fail_sync: bool,
    /// Artificial delay before a clear settles
    pub latency_ms: u64,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
