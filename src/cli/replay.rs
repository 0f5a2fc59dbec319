use crate::config::AppConfig;
use crate::models::CallHistoryDetails;
use crate::services::{CallHistorySync, LocalCallHistoryBackend, SyncMessage};
use crate::state::{CallHistoryActions, RootState, Store};
use crate::Result;
use anyhow::Context;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Load records from a JSON array file
pub fn load_records(path: &Path) -> Result<Vec<CallHistoryDetails>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse call history records in {}", path.display()))
}

/// Feed records through a store, optionally clear, and return the final
/// state along with the backend that served the clear
pub async fn replay(
    records: Vec<CallHistoryDetails>,
    clear: bool,
    config: &AppConfig,
) -> Result<(RootState, Arc<LocalCallHistoryBackend>)> {
    let backend = Arc::new(
        LocalCallHistoryBackend::new(config.sync.clone()).with_records(records.iter().cloned()),
    );

    let (store, dispatcher) = Store::new();
    let store_task = tokio::spawn(store.run());

    let sync: Arc<dyn CallHistorySync> = backend.clone();
    let actions = CallHistoryActions::bind(dispatcher, sync);

    info!(count = records.len(), "caching call history records");
    for record in records {
        actions.cache_call_history(record);
    }

    if clear {
        actions
            .clear_all_call_history()
            .await
            .context("Clear call history task failed")?;
    }

    drop(actions);
    let state = store_task.await.context("Store task failed")?;

    Ok((state, backend))
}

pub async fn run(records_path: &Path, clear: bool, config: &AppConfig) -> Result<()> {
    let records = load_records(records_path)?;
    let (state, backend) = replay(records, clear, config).await?;

    let history = &state.call_history;
    println!("{}", "Call history".cyan().bold());
    println!("  Edition:  {}", history.edition());
    println!("  Cached:   {}", history.len());

    let mut call_ids: Vec<&String> = history.call_history_by_call_id().keys().collect();
    call_ids.sort();
    for call_id in call_ids {
        println!("    - {}", call_id);
    }

    match &state.toast.toast {
        Some(toast) => println!("  Toast:    {}", toast.toast_type.to_string().green()),
        None => println!("  Toast:    {}", "none".dimmed()),
    }

    println!("  Stored:   {}", backend.record_count());

    let outbox = backend.outbox();
    if outbox.is_empty() {
        println!("  Sync:     {}", "no messages".dimmed());
    } else {
        for message in outbox {
            match message {
                SyncMessage::CallLogEvent { kind, timestamp } => {
                    println!("  Sync:     {:?} up to {}", kind, timestamp);
                }
            }
        }
    }

    Ok(())
}
