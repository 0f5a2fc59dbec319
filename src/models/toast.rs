use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of toast the call history flows can raise
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ToastType {
    CallHistoryCleared,
}

impl ToastType {
    /// User-facing text for this toast
    pub fn message(&self) -> &'static str {
        match self {
            ToastType::CallHistoryCleared => "Call history cleared",
        }
    }
}

impl fmt::Display for ToastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A toast currently on screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub toast_type: ToastType,
}
