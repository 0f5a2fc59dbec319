//! Collaborators the state layer calls out to

pub mod call_disposition;

pub use call_disposition::{CallHistorySync, CallLogEventKind, LocalCallHistoryBackend, SyncMessage};
