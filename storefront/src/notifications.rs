//! Transient toast notifications.

use crate::types::ToastKind;
use shield_point_core::effect::EffectId;

/// A visible notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Sequential id
    pub id: u64,
    /// Text shown to the user
    pub message: String,
    /// Flavour
    pub kind: ToastKind,
}

impl Toast {
    /// Cancellation id for this toast's dismissal timer
    #[must_use]
    pub fn timer(&self) -> EffectId {
        timer_for(self.id)
    }
}

/// Cancellation id for the dismissal timer of toast `id`
#[must_use]
pub fn timer_for(id: u64) -> EffectId {
    EffectId::new(format!("toast-{id}"))
}

/// Visible toasts, oldest first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notifications {
    toasts: Vec<Toast>,
    last_id: u64,
}

impl Notifications {
    /// Show a toast and return it
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) -> &Toast {
        self.last_id += 1;
        let index = self.toasts.len();
        self.toasts.push(Toast {
            id: self.last_id,
            message: message.into(),
            kind,
        });
        &self.toasts[index]
    }

    /// Remove a toast; `false` if it was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Visible toasts
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Returns `true` when nothing is showing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_unique() {
        let mut notifications = Notifications::default();
        let first = notifications.push("one", ToastKind::Success).id;
        let second = notifications.push("two", ToastKind::Info).id;
        notifications.dismiss(first);
        let third = notifications.push("three", ToastKind::Info).id;

        assert_eq!((first, second, third), (1, 2, 3));
        assert_eq!(notifications.toasts().len(), 2);
    }

    #[test]
    fn dismiss_unknown_is_noop() {
        let mut notifications = Notifications::default();
        notifications.push("one", ToastKind::Success);

        assert!(!notifications.dismiss(42));
        assert_eq!(notifications.toasts().len(), 1);
    }

    #[test]
    fn timer_ids_are_per_toast() {
        let mut notifications = Notifications::default();
        let timer = notifications.push("hi", ToastKind::Info).timer();
        assert_eq!(timer.as_str(), "toast-1");
    }
}
