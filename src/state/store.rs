//! Root state, action queue, and dispatch handles

use super::call_history::{self, CallHistoryAction, CallHistoryState};
use super::toast::{self, ToastAction, ToastState};
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace_span};

/// Every action the root reducer understands
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CallHistory(CallHistoryAction),
    Toast(ToastAction),
}

impl Action {
    /// Stable name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Action::CallHistory(action) => action.name(),
            Action::Toast(action) => action.name(),
        }
    }
}

impl From<CallHistoryAction> for Action {
    fn from(action: CallHistoryAction) -> Self {
        Action::CallHistory(action)
    }
}

impl From<ToastAction> for Action {
    fn from(action: ToastAction) -> Self {
        Action::Toast(action)
    }
}

/// Application-wide state, composed of one slice per concern
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub call_history: CallHistoryState,
    pub toast: ToastState,
}

/// Hand every action to every slice
pub fn reducer(state: RootState, action: &Action) -> RootState {
    RootState {
        call_history: call_history::reducer(state.call_history, action),
        toast: toast::reducer(state.toast, action),
    }
}

/// An asynchronous unit of work that dispatches actions as it goes
#[async_trait]
pub trait Thunk: Send {
    async fn run(self: Box<Self>, dispatch: &Dispatcher);
}

/// Cloneable handle that feeds the store's action queue
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Action>,
}

impl Dispatcher {
    /// A dispatcher wired to a bare queue, for hosts that run their own
    /// reducer loop
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue an action; silently dropped once the store is gone
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let name = action.name();
        if self.tx.send(action).is_err() {
            debug!(action = name, "store is closed, dropping action");
        }
    }

    /// Run a thunk to completion on the current tokio runtime
    pub fn dispatch_thunk<T>(&self, thunk: T) -> JoinHandle<()>
    where
        T: Thunk + 'static,
    {
        let dispatch = self.clone();
        tokio::spawn(async move { Box::new(thunk).run(&dispatch).await })
    }

    /// Whether a store is still consuming this queue
    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Owns the root state and applies queued actions one at a time
pub struct Store {
    state: RootState,
    rx: mpsc::UnboundedReceiver<Action>,
    snapshots: watch::Sender<RootState>,
}

impl Store {
    /// Create an empty store and the first dispatcher for it
    pub fn new() -> (Self, Dispatcher) {
        Self::with_state(RootState::default())
    }

    pub fn with_state(state: RootState) -> (Self, Dispatcher) {
        let (dispatcher, rx) = Dispatcher::channel();
        let (snapshots, _) = watch::channel(state.clone());
        let store = Self {
            state,
            rx,
            snapshots,
        };
        (store, dispatcher)
    }

    /// Current state (read-only)
    pub fn state(&self) -> &RootState {
        &self.state
    }

    /// Receive a snapshot after every applied action
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.snapshots.subscribe()
    }

    /// Reduce a single action synchronously
    pub fn apply(&mut self, action: Action) {
        let span = trace_span!("reduce", action = action.name());
        let _enter = span.enter();

        let state = std::mem::take(&mut self.state);
        self.state = reducer(state, &action);
        self.snapshots.send_replace(self.state.clone());
    }

    /// Apply everything already queued; returns how many actions ran
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.rx.try_recv() {
            self.apply(action);
            applied += 1;
        }
        applied
    }

    /// Apply actions until every dispatcher has been dropped
    pub async fn run(mut self) -> RootState {
        while let Some(action) = self.rx.recv().await {
            self.apply(action);
        }
        debug!("all dispatchers dropped, store stopping");
        self.state
    }
}
