use crate::core::NotificationSink;

/// Prints notifications to stderr, for the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn error(&self, message: &str) {
        tracing::debug!("Notification: {}", message);
        eprintln!("❌ {}", message);
    }
}

/// Routes notifications into the log, for hosts without a user-facing channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn error(&self, message: &str) {
        tracing::error!(target: "cart_store::notify", "{}", message);
    }
}
