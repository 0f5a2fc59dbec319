// call-history - Call history cache for a messaging client's UI state
// Caches call records by id and clears them locally and across linked devices

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use models::{CallHistoryDetails, ToastType};
pub use services::{CallHistorySync, LocalCallHistoryBackend};
pub use state::{
    cache_call_history, clear_all_call_history, Action, CallHistoryAction, CallHistoryActions,
    CallHistoryState, Dispatcher, RootState, Store,
};
