pub mod call_history;
pub mod toast;

pub use call_history::{CallDirection, CallHistoryDetails, CallMode, CallStatus, CallType};
pub use toast::{Toast, ToastType};
