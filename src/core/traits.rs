//! Collaborator and capability seams for the session engine
//!
//! The core emits structured events for an external notification surface
//! and reaches the environment (speech input, clipboard, share sheet)
//! through capability traits. Presentation is the collaborator's job: the
//! core hands over entity names, amounts, and statuses, never formatted
//! message strings.

use crate::types::{TxId, TxStatus};
use rust_decimal::Decimal;
use tracing::info;

/// Structured notification event emitted by session operations
///
/// Carries enough detail (entity name, amount, status) for a notification
/// collaborator to render a human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A receive-account was added
    AccountAdded { handle: String, name: String },

    /// A receive-account was removed
    AccountRemoved { handle: String, name: String },

    /// The default receive-account changed
    DefaultChanged { handle: String },

    /// A bill item was added
    ItemAdded { name: String, amount: Decimal },

    /// A bill item was removed
    ItemRemoved { name: String },

    /// A payment request was recorded as pending
    TransactionInitiated {
        id: TxId,
        reference: String,
        amount: Decimal,
    },

    /// A pending transaction reached a terminal status
    TransactionSettled {
        id: TxId,
        reference: String,
        status: TxStatus,
    },
}

/// Sink for session events
///
/// The notification/toast surface implements this; the core only calls
/// `emit`. Implementations must not block.
pub trait EventSink {
    /// Deliver one event to the collaborator
    fn emit(&self, event: SessionEvent);
}

/// Sink that drops every event
///
/// Default for headless and test sessions that don't observe notifications.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: SessionEvent) {}
}

/// Sink that forwards events to the tracing subscriber
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: SessionEvent) {
        info!(?event, "session event");
    }
}

/// Speech capture capability
///
/// Browser targets back this with the speech-recognition API; everywhere
/// else the no-op stub applies and dictation is simply unavailable.
pub trait SpeechInput {
    /// Capture one utterance, returning its transcript if any was heard
    fn capture(&self) -> Option<String>;
}

/// Clipboard capability
pub trait Clipboard {
    /// Place text on the clipboard
    fn copy(&self, text: &str);
}

/// Share-sheet capability
pub trait ShareTarget {
    /// Offer a titled link to the platform share surface
    fn share(&self, title: &str, uri: &str);
}

/// No-op environment for non-browser targets
///
/// Implements every capability as a stub: speech hears nothing, clipboard
/// and share silently discard.
#[derive(Debug, Default)]
pub struct NoopEnvironment;

impl SpeechInput for NoopEnvironment {
    fn capture(&self) -> Option<String> {
        None
    }
}

impl Clipboard for NoopEnvironment {
    fn copy(&self, _text: &str) {}
}

impl ShareTarget for NoopEnvironment {
    fn share(&self, _title: &str, _uri: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_environment_hears_nothing() {
        assert_eq!(NoopEnvironment.capture(), None);
    }

    #[test]
    fn test_null_sink_accepts_events() {
        // Just must not panic
        NullSink.emit(SessionEvent::DefaultChanged {
            handle: "a@b".to_string(),
        });
    }
}
