//! Status-notification sink interface.
//!
//! The concrete AMQP transport is an external collaborator and out of
//! scope; what's in the core is the `Notifier` trait and the JSON-shaped
//! payload structs it hands to implementations, so a future AMQP-backed
//! notifier only has to serialize-and-publish.

use serde::Serialize;

use crate::tracing_support::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

/// Payload for the user-facing message routing key.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePayload {
    pub title: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub footnote: String,
}

/// Payload for the state-update routing key.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatePayload {
    pub frame: usize,
    pub theta1: i16,
    pub theta2: i16,
    pub d3: i16,
}

pub trait Notifier: Send {
    fn message(&self, title: &str, severity: Severity, footnote: &str);
    fn state(&self, frame_index: usize, theta1: i16, theta2: i16, d3: i16);
}

/// Default notifier: structured `tracing` events carrying the same
/// key/value document an AMQP publisher would serialize.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn message(&self, title: &str, severity: Severity, footnote: &str) {
        let payload = MessagePayload {
            title: title.to_string(),
            severity,
            footnote: footnote.to_string(),
        };
        match severity {
            Severity::Error => error!(payload = %serde_json::to_string(&payload).unwrap_or_default(), "notify"),
            Severity::Warning => warn!(payload = %serde_json::to_string(&payload).unwrap_or_default(), "notify"),
            Severity::Info | Severity::Success => {
                info!(payload = %serde_json::to_string(&payload).unwrap_or_default(), "notify")
            }
        }
    }

    fn state(&self, frame_index: usize, theta1: i16, theta2: i16, d3: i16) {
        let payload = StatePayload {
            frame: frame_index,
            theta1,
            theta2,
            d3,
        };
        trace!(payload = %serde_json::to_string(&payload).unwrap_or_default(), "state");
    }
}

/// Discards every notification. Useful for fuzzing/benchmarking the
/// pipeline without log noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn message(&self, _title: &str, _severity: Severity, _footnote: &str) {}
    fn state(&self, _frame_index: usize, _theta1: i16, _theta2: i16, _d3: i16) {}
}

/// A [`Notifier`] that records every call instead of emitting it, shared by
/// this module's tests and by the link-sender tests that need to assert on
/// which notifications a run produced.
#[cfg(test)]
pub(crate) mod testing {
    use super::{Notifier, Severity};
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    pub struct RecordingNotifier {
        pub messages: Arc<Mutex<Vec<(String, Severity, String)>>>,
        pub states: Arc<Mutex<Vec<(usize, i16, i16, i16)>>>,
    }

    impl Notifier for RecordingNotifier {
        fn message(&self, title: &str, severity: Severity, footnote: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((title.to_string(), severity, footnote.to_string()));
        }

        fn state(&self, frame_index: usize, theta1: i16, theta2: i16, d3: i16) {
            self.states.lock().unwrap().push((frame_index, theta1, theta2, d3));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[test]
    fn message_payload_serializes_with_expected_shape() {
        let payload = MessagePayload {
            title: "Emergency Stop (0)".to_string(),
            severity: Severity::Error,
            footnote: "stopped".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "Emergency Stop (0)");
        assert_eq!(json["type"], "error");
        assert_eq!(json["footnote"], "stopped");
    }

    #[test]
    fn recording_notifier_captures_calls() {
        let notifier = RecordingNotifier::default();
        notifier.message("title", Severity::Warning, "note");
        notifier.state(3, 1, 2, 3);
        assert_eq!(notifier.messages.lock().unwrap().len(), 1);
        assert_eq!(notifier.states.lock().unwrap().len(), 1);
    }
}
