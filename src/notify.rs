//! src/notify.rs
use actix_web_flash_messages::{FlashMessage, Level};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// An ephemeral user-facing message, rendered as a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Fire-and-forget sink for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Queues notices as flash messages on the outgoing response. Only usable
/// from a handler running inside `FlashMessagesFramework`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlashNotifier;

impl Notifier for FlashNotifier {
    fn notify(&self, notice: Notice) {
        let level = match notice.severity {
            Severity::Success => Level::Success,
            Severity::Info => Level::Info,
            Severity::Warning => Level::Warning,
            Severity::Error => Level::Error,
        };

        match serde_json::to_string(&notice) {
            Ok(content) => FlashMessage::new(content, level).send(),
            Err(e) => tracing::error!(
                error.cause_chain = ?e,
                "Failed to serialize notice \"{}\"", notice.title
            ),
        }
    }
}

impl Notice {
    /// Inverse of what `FlashNotifier` stores. Content that is not a
    /// serialized notice is shown as a bare description.
    pub fn from_flash(message: &FlashMessage) -> Self {
        serde_json::from_str(message.content()).unwrap_or_else(|_| {
            let severity = match message.level() {
                Level::Success => Severity::Success,
                Level::Warning => Severity::Warning,
                Level::Error => Severity::Error,
                _ => Severity::Info,
            };
            Notice::new(severity, "", message.content())
        })
    }
}
