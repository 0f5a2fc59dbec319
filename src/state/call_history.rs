//! Call history slice
//!
//! Caches call records by call id and tracks an edition that bumps whenever
//! the whole history is invalidated. Single-record upserts leave the edition
//! alone, so consumers can tell "one entry changed" from "everything changed"
//! without diffing the map.

use super::store::{Action, Dispatcher, Thunk};
use super::toast::show_toast;
use crate::errors::to_log_format;
use crate::models::{CallHistoryDetails, ToastType};
use crate::services::CallHistorySync;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::error;

/// Opaque generation counter for the call history set
///
/// Only comparable; the value itself carries no meaning. Pinned at
/// `u64::MAX` once reached rather than wrapping back below earlier editions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edition(u64);

impl Edition {
    fn next(self) -> Self {
        Edition(self.0.saturating_add(1))
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallHistoryState {
    edition: Edition,
    call_history_by_call_id: Arc<HashMap<String, CallHistoryDetails>>,
}

impl CallHistoryState {
    pub fn edition(&self) -> Edition {
        self.edition
    }

    pub fn get(&self, call_id: &str) -> Option<&CallHistoryDetails> {
        self.call_history_by_call_id.get(call_id)
    }

    pub fn call_history_by_call_id(&self) -> &HashMap<String, CallHistoryDetails> {
        &self.call_history_by_call_id
    }

    pub fn len(&self) -> usize {
        self.call_history_by_call_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.call_history_by_call_id.is_empty()
    }

    /// True when both states share the same underlying map
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.edition == other.edition
            && Arc::ptr_eq(&self.call_history_by_call_id, &other.call_history_by_call_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallHistoryAction {
    /// Insert or replace one record under its call id
    Cache(CallHistoryDetails),
    /// Drop every cached record and bump the edition
    Reset,
}

impl CallHistoryAction {
    pub fn name(&self) -> &'static str {
        match self {
            CallHistoryAction::Cache(_) => "callHistory/CACHE",
            CallHistoryAction::Reset => "callHistory/RESET",
        }
    }
}

pub fn cache_call_history(call_history: CallHistoryDetails) -> CallHistoryAction {
    CallHistoryAction::Cache(call_history)
}

pub fn clear_all_call_history(sync: Arc<dyn CallHistorySync>) -> ClearAllCallHistory {
    ClearAllCallHistory { sync }
}

pub fn reducer(state: CallHistoryState, action: &Action) -> CallHistoryState {
    let Action::CallHistory(action) = action else {
        return state;
    };

    match action {
        CallHistoryAction::Reset => CallHistoryState {
            edition: state.edition.next(),
            call_history_by_call_id: Arc::default(),
        },
        CallHistoryAction::Cache(record) => {
            let mut state = state;
            Arc::make_mut(&mut state.call_history_by_call_id)
                .insert(record.call_id.clone(), record.clone());
            state
        }
    }
}

/// Clears call history in storage and on linked devices, then resets the
/// local cache whether or not that worked
pub struct ClearAllCallHistory {
    sync: Arc<dyn CallHistorySync>,
}

/// Dispatches `Reset` when dropped, so no exit path can skip it
struct ResetOnExit<'a> {
    dispatch: &'a Dispatcher,
}

impl Drop for ResetOnExit<'_> {
    fn drop(&mut self) {
        // Force a reset even if the clear failed.
        self.dispatch.dispatch(CallHistoryAction::Reset);
    }
}

#[async_trait]
impl Thunk for ClearAllCallHistory {
    async fn run(self: Box<Self>, dispatch: &Dispatcher) {
        let _reset = ResetOnExit { dispatch };

        match self.sync.clear_call_history_data_and_sync().await {
            Ok(()) => {
                dispatch.dispatch(show_toast(ToastType::CallHistoryCleared));
            }
            Err(e) => {
                error!(error = %to_log_format(&e), "Error clearing call history");
            }
        }
    }
}

/// Call history action creators bound to a dispatcher
#[derive(Clone)]
pub struct CallHistoryActions {
    dispatch: Dispatcher,
    sync: Arc<dyn CallHistorySync>,
}

impl CallHistoryActions {
    pub fn bind(dispatch: Dispatcher, sync: Arc<dyn CallHistorySync>) -> Self {
        Self { dispatch, sync }
    }

    pub fn cache_call_history(&self, call_history: CallHistoryDetails) {
        self.dispatch.dispatch(cache_call_history(call_history));
    }

    pub fn clear_all_call_history(&self) -> JoinHandle<()> {
        self.dispatch
            .dispatch_thunk(clear_all_call_history(Arc::clone(&self.sync)))
    }
}
