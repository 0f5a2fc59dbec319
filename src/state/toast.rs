//! Toast slice: at most one toast is visible at a time

use super::store::Action;
use crate::models::{Toast, ToastType};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastState {
    pub toast: Option<Toast>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToastAction {
    /// Replace whatever is on screen with this toast
    Show { toast_type: ToastType },
    Hide,
}

impl ToastAction {
    pub fn name(&self) -> &'static str {
        match self {
            ToastAction::Show { .. } => "toast/SHOW_TOAST",
            ToastAction::Hide => "toast/HIDE_TOAST",
        }
    }
}

pub fn show_toast(toast_type: ToastType) -> ToastAction {
    ToastAction::Show { toast_type }
}

pub fn reducer(state: ToastState, action: &Action) -> ToastState {
    match action {
        Action::Toast(ToastAction::Show { toast_type }) => ToastState {
            toast: Some(Toast {
                toast_type: *toast_type,
            }),
        },
        Action::Toast(ToastAction::Hide) => ToastState { toast: None },
        _ => state,
    }
}
