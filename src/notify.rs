//! System notifications.
//!
//! Warnings and errors are the only way a failed rephrase reaches the user,
//! so the tracing layer here turns them into desktop notifications. Events
//! from the pipeline carry `path` and `backend` fields which name the
//! notification after the request that failed.

use notify_rust::Notification;
use pouf_engine::TRIGGER_MARKER;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, debug};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::{APP_NAME, APP_NAME_PRETTY};

/// Send a system notification with a summary and body.
pub fn notify(summary: &str, body: &str) {
    Notification::new()
        .appname(APP_NAME)
        .summary(&format!("{} - {}", APP_NAME_PRETTY, summary))
        .body(body)
        .show()
        .map_err(|e| debug!("Failed to send notification: {}", e))
        .ok();
}

/// The fields of an event that end up in a notification.
#[derive(Debug, Default)]
struct NotificationFields {
    message: Option<String>,
    /// Which activation ran: "hotkey" or "trigger"
    path: Option<String>,
    backend: Option<String>,
}

impl NotificationFields {
    fn summary(&self, level: Level) -> Option<String> {
        let summary = match (level, self.backend.as_deref()) {
            (Level::ERROR, Some(backend)) => format!("{} rephrase failed", backend),
            (Level::ERROR, None) => "error".to_string(),
            (Level::WARN, _) => "warning".to_string(),
            _ => return None,
        };
        Some(summary)
    }

    fn body(&self) -> Option<String> {
        let message = self.message.as_deref()?;
        let origin = match self.path.as_deref() {
            Some("hotkey") => "Started with the hotkey".to_string(),
            Some("trigger") => format!("Started by typing {}", TRIGGER_MARKER),
            _ => return Some(message.to_string()),
        };
        Some(format!("{}\n{}", message, origin))
    }
}

impl Visit for NotificationFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            "path" => self.path = Some(value.to_string()),
            "backend" => self.backend = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        }
    }
}

/// Tracing layer that sends notifications for warnings and errors.
#[derive(Debug, Default)]
pub struct NotificationLayer {}

impl NotificationLayer {
    pub fn new() -> Self {
        Self {}
    }
}

impl<S: Subscriber> Layer<S> for NotificationLayer {
    fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::WARN {
            return;
        }

        let mut fields = NotificationFields::default();
        event.record(&mut fields);

        if let (Some(summary), Some(body)) = (fields.summary(level), fields.body()) {
            notify(&summary, &body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_warnings_and_errors_notify() {
        let fields = NotificationFields::default();
        assert_eq!(fields.summary(Level::ERROR).as_deref(), Some("error"));
        assert_eq!(fields.summary(Level::WARN).as_deref(), Some("warning"));
        assert_eq!(fields.summary(Level::INFO), None);
        assert_eq!(fields.summary(Level::DEBUG), None);
    }

    #[test]
    fn test_failed_rephrase_names_backend_and_path() {
        let fields = NotificationFields {
            message: Some("Rephrase aborted: request timed out after 30s".into()),
            path: Some("trigger".into()),
            backend: Some("Gemini".into()),
        };

        assert_eq!(
            fields.summary(Level::ERROR).as_deref(),
            Some("Gemini rephrase failed")
        );
        assert_eq!(
            fields.body().as_deref(),
            Some("Rephrase aborted: request timed out after 30s\nStarted by typing ::fix")
        );
    }

    #[test]
    fn test_plain_warning_keeps_message() {
        let fields = NotificationFields {
            message: Some("Failed to update tray icon".into()),
            ..Default::default()
        };
        assert_eq!(fields.body().as_deref(), Some("Failed to update tray icon"));
        assert_eq!(fields.summary(Level::WARN).as_deref(), Some("warning"));
    }
}
