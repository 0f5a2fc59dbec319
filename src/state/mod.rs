//! In-memory UI state
//!
//! The application state is a tree of slices, each with its own pure reducer:
//! - Call history cache and its clear-all workflow
//! - Toast notifications
//!
//! `Store` owns the root state and applies actions from a serialized queue;
//! `Dispatcher` handles feed that queue and run thunks.

pub mod call_history;
pub mod store;
pub mod toast;

pub use call_history::{
    cache_call_history, clear_all_call_history, CallHistoryAction, CallHistoryActions,
    CallHistoryState, ClearAllCallHistory, Edition,
};
pub use store::{reducer, Action, Dispatcher, RootState, Store, Thunk};
pub use toast::{show_toast, ToastAction, ToastState};
