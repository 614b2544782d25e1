//! User-facing notifications on phase completion.
//!
//! Delivery is best-effort: implementations swallow their own failures and
//! the timer never looks at the outcome.

use crate::timer::Phase;

pub trait Notifier: Send {
    fn notify(&self, title: &str, body: &str);
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _body: &str) {}
}

/// Emits notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(target: "planora::notify", "{title} {body}");
    }
}

/// Title and body announcing that `completed` just ended.
pub fn phase_message(completed: Phase) -> (&'static str, &'static str) {
    match completed {
        Phase::Focus => ("Focus Session Complete!", "Great work! Time for a break."),
        Phase::Break => ("Break Complete!", "Ready to focus again?"),
    }
}
