//! Clear-and-sync collaborator
//!
//! `CallHistorySync` is the seam to whatever owns durable call history and
//! linked-device sync. `LocalCallHistoryBackend` is an in-process
//! implementation used by the CLI and tests.

use crate::config::SyncConfig;
use crate::errors::ClearHistoryError;
use crate::models::CallHistoryDetails;
use crate::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error};

/// Deletes call history in durable storage and tells linked devices to do
/// the same
#[async_trait]
pub trait CallHistorySync: Send + Sync {
    async fn clear_call_history_data_and_sync(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CallLogEventKind {
    Clear,
}

/// Message queued for linked devices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SyncMessage {
    #[serde(rename_all = "camelCase")]
    CallLogEvent {
        kind: CallLogEventKind,
        /// Records at or before this instant (ms) are cleared
        timestamp: i64,
    },
}

#[derive(Debug, Default)]
struct BackendInner {
    records: HashMap<String, CallHistoryDetails>,
    outbox: Vec<SyncMessage>,
}

/// In-memory stand-in for durable call history with a linked-device outbox
#[derive(Debug, Default)]
pub struct LocalCallHistoryBackend {
    inner: Mutex<BackendInner>,
    config: SyncConfig,
}

impl LocalCallHistoryBackend {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            inner: Mutex::default(),
            config,
        }
    }

    /// Lock for reads and seeding; a poisoned lock still holds usable data
    fn lock(&self) -> MutexGuard<'_, BackendInner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            error!("call history backend lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Seed the backend with records
    pub fn with_records(self, records: impl IntoIterator<Item = CallHistoryDetails>) -> Self {
        self.lock()
            .records
            .extend(records.into_iter().map(|r| (r.call_id.clone(), r)));
        self
    }

    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }

    /// Sync messages emitted so far, oldest first
    pub fn outbox(&self) -> Vec<SyncMessage> {
        self.lock().outbox.clone()
    }

    fn clear_before(&self, timestamp: i64) -> Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| ClearHistoryError::Storage(e.to_string()))?;

        let before = inner.records.len();
        inner.records.retain(|_, r| r.timestamp > timestamp);
        let removed = before - inner.records.len();

        if self.config.fail_sync {
            return Err(ClearHistoryError::Sync("no linked devices reachable".to_string()).into());
        }

        inner.outbox.push(SyncMessage::CallLogEvent {
            kind: CallLogEventKind::Clear,
            timestamp,
        });

        Ok(removed)
    }
}

#[async_trait]
impl CallHistorySync for LocalCallHistoryBackend {
    async fn clear_call_history_data_and_sync(&self) -> Result<()> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail_clear {
            return Err(ClearHistoryError::Unavailable.into());
        }

        let timestamp = Utc::now().timestamp_millis();
        let removed = self.clear_before(timestamp)?;
        debug!(removed, timestamp, "cleared call history and queued sync message");

        Ok(())
    }
}
