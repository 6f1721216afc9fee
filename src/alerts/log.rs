// Log Alert Sink - structured logging via tracing

use crate::alerts::{AlertEvent, AlertSink};
use crate::Result;
use async_trait::async_trait;

/// Writes every event to the process log. Always configured; email is
/// layered on top of it when enabled.
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertSink for LogSink {
    async fn emit(&self, event: &AlertEvent) -> Result<()> {
        match event {
            AlertEvent::ExpiryWarning { domain, .. } => {
                tracing::warn!(domain = %domain, "{}", event.message());
            }
            AlertEvent::FetchFailure { domain, .. } => {
                tracing::error!(domain = %domain, "{}", event.message());
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
