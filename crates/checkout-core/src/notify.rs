//! User Notices
//!
//! Where submission results are surfaced: a blocking alert in the browser, a
//! log line, or an in-memory record for tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// How server-rejected submissions reach the user
///
/// The missing-redirect notice is always shown regardless of this setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSurface {
    /// Show the message to the user
    #[default]
    Alert,
    /// Only log it
    Log,
}

impl ErrorSurface {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "alert" => Some(Self::Alert),
            "log" => Some(Self::Log),
            _ => None,
        }
    }
}

/// Surface for user-visible messages
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Notifier that writes to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(notice = %message, "Checkout notice");
    }
}

/// Notifier that keeps every message (for development/testing)
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_clones_share_messages() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        handle.alert("card declined");
        assert_eq!(notifier.messages(), vec!["card declined"]);
    }

    #[test]
    fn test_error_surface_parse() {
        assert_eq!(ErrorSurface::parse(" Log "), Some(ErrorSurface::Log));
        assert_eq!(ErrorSurface::parse("alert"), Some(ErrorSurface::Alert));
        assert_eq!(ErrorSurface::parse("popup"), None);
    }
}
