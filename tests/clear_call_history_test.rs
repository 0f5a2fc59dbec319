//! Integration tests for the clear-all call history workflow
//!
//! These tests verify the dispatch sequence on success and failure, that the
//! reset always happens, and how the workflow behaves against a live store.

use async_trait::async_trait;
use call_history::errors::ClearHistoryError;
use call_history::state::{reducer, show_toast, Action, Thunk};
use call_history::{
    cache_call_history, clear_all_call_history, CallHistoryAction, CallHistoryActions,
    CallHistoryDetails, CallHistorySync, Dispatcher, Store, ToastType,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};
use tracing_subscriber::fmt::MakeWriter;

// =========================================================================
// Helpers
// =========================================================================

enum Outcome {
    Succeed,
    Fail,
    Panic,
}

struct FakeSync {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl FakeSync {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallHistorySync for FakeSync {
    async fn clear_call_history_data_and_sync(&self) -> call_history::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Fail => Err(ClearHistoryError::Sync("linked device unreachable".to_string()).into()),
            Outcome::Panic => panic!("storage layer crashed"),
        }
    }
}

/// Parks inside the external call until released
#[derive(Default)]
struct GatedSync {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl CallHistorySync for GatedSync {
    async fn clear_call_history_data_and_sync(&self) -> call_history::Result<()> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

fn collect(rx: &mut mpsc::UnboundedReceiver<Action>) -> Vec<Action> {
    let mut actions = Vec::new();
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }
    actions
}

async fn run_clear(sync: Arc<FakeSync>, dispatch: &Dispatcher) {
    let sync: Arc<dyn CallHistorySync> = sync;
    Box::new(clear_all_call_history(sync)).run(dispatch).await;
}

// =========================================================================
// Dispatch sequence
// =========================================================================

#[tokio::test]
async fn test_success_shows_toast_then_resets() {
    let (logs, _guard) = capture_logs();
    let (dispatch, mut rx) = Dispatcher::channel();
    let sync = FakeSync::new(Outcome::Succeed);

    run_clear(sync.clone(), &dispatch).await;

    assert_eq!(sync.calls(), 1);
    assert_eq!(
        collect(&mut rx),
        vec![
            Action::Toast(show_toast(ToastType::CallHistoryCleared)),
            Action::CallHistory(CallHistoryAction::Reset),
        ]
    );
    assert_eq!(logs.contents(), "");
}

#[tokio::test]
async fn test_failure_logs_and_still_resets() {
    let (logs, _guard) = capture_logs();
    let (dispatch, mut rx) = Dispatcher::channel();
    let sync = FakeSync::new(Outcome::Fail);

    run_clear(sync.clone(), &dispatch).await;

    assert_eq!(sync.calls(), 1);
    assert_eq!(
        collect(&mut rx),
        vec![Action::CallHistory(CallHistoryAction::Reset)]
    );

    let output = logs.contents();
    assert_eq!(output.matches("Error clearing call history").count(), 1);
    assert!(output.contains("ERROR"));
    assert!(output.contains("linked device unreachable"));
}

#[tokio::test]
async fn test_panic_in_clear_still_resets() {
    let (dispatch, mut rx) = Dispatcher::channel();
    let sync = FakeSync::new(Outcome::Panic);

    let sync: Arc<dyn CallHistorySync> = sync;
    let result = dispatch.dispatch_thunk(clear_all_call_history(sync)).await;

    assert!(result.unwrap_err().is_panic());
    assert_eq!(
        collect(&mut rx),
        vec![Action::CallHistory(CallHistoryAction::Reset)]
    );
}

#[tokio::test]
async fn test_runs_to_completion_after_store_is_gone() {
    let (dispatch, rx) = Dispatcher::channel();
    drop(rx);
    let sync = FakeSync::new(Outcome::Succeed);

    run_clear(sync.clone(), &dispatch).await;

    assert_eq!(sync.calls(), 1);
    assert!(!dispatch.is_connected());
}

// =========================================================================
// Against a live store
// =========================================================================

#[tokio::test]
async fn test_clear_resets_cached_history() {
    let (mut store, dispatch) = Store::new();
    let initial_edition = store.state().call_history.edition();

    dispatch.dispatch(cache_call_history(CallHistoryDetails::new("abc", "p1", 1)));
    dispatch.dispatch(cache_call_history(CallHistoryDetails::new("def", "p2", 2)));
    store.drain();
    assert_eq!(store.state().call_history.len(), 2);

    let actions = CallHistoryActions::bind(dispatch, FakeSync::new(Outcome::Fail));
    actions.clear_all_call_history().await.unwrap();
    store.drain();

    let state = store.state();
    assert!(state.call_history.is_empty());
    assert!(state.call_history.edition() > initial_edition);
    assert_eq!(state.toast.toast, None);
}

#[tokio::test]
async fn test_cache_after_clear_survives_reset() {
    let (store, dispatch) = Store::new();
    let mut snapshots = store.subscribe();
    let store_task = tokio::spawn(store.run());

    let actions = CallHistoryActions::bind(dispatch, FakeSync::new(Outcome::Succeed));
    actions.cache_call_history(CallHistoryDetails::new("before", "p1", 1));
    actions.clear_all_call_history().await.unwrap();
    actions.cache_call_history(CallHistoryDetails::new("after", "p1", 2));
    drop(actions);

    let state = store_task.await.unwrap();
    assert!(state.call_history.get("before").is_none());
    assert!(state.call_history.get("after").is_some());
    assert_eq!(
        state.toast.toast.map(|t| t.toast_type),
        Some(ToastType::CallHistoryCleared)
    );

    assert!(snapshots.has_changed().unwrap_or(true));
    assert_eq!(snapshots.borrow_and_update().call_history.len(), 1);
}

#[tokio::test]
async fn test_store_applies_cache_while_clear_is_suspended() {
    let (store, dispatch) = Store::new();
    let mut snapshots = store.subscribe();
    let store_task = tokio::spawn(store.run());

    let sync = Arc::new(GatedSync::default());
    let actions = CallHistoryActions::bind(dispatch, sync.clone());
    actions.cache_call_history(CallHistoryDetails::new("before", "p1", 1));

    let clear = actions.clear_all_call_history();
    sync.entered.notified().await;
    actions.cache_call_history(CallHistoryDetails::new("during", "p1", 2));

    loop {
        snapshots.changed().await.unwrap();
        if snapshots.borrow_and_update().call_history.get("during").is_some() {
            break;
        }
    }
    let suspended = snapshots.borrow().clone();
    assert!(!clear.is_finished());
    assert_eq!(suspended.call_history.len(), 2);
    assert!(suspended.call_history.get("before").is_some());
    assert_eq!(suspended.toast.toast, None);

    sync.release.notify_one();
    clear.await.unwrap();
    drop(actions);

    let state = store_task.await.unwrap();
    let reset_once = reducer(suspended, &Action::CallHistory(CallHistoryAction::Reset));
    assert!(state.call_history.is_empty());
    assert_eq!(state.call_history.edition(), reset_once.call_history.edition());
    assert_eq!(
        state.toast.toast.map(|t| t.toast_type),
        Some(ToastType::CallHistoryCleared)
    );
}
