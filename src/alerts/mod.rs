// Alert delivery - pluggable sinks for check results
//
// The runner emits events into an injected sink; nothing here is a process
// singleton. Sinks must tolerate concurrent emission.

pub mod email;
pub mod log;

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub use email::EmailSink;
pub use log::LogSink;

use async_trait::async_trait;

/// An externally observable check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AlertEvent {
    /// Certificate expires within the warning window (or already has)
    ExpiryWarning {
        domain: String,
        window_days: u32,
        not_after: DateTime<Utc>,
    },
    /// Expiration date could not be determined for a domain
    FetchFailure { domain: String, reason: String },
}

impl AlertEvent {
    /// Domain the event refers to.
    pub fn domain(&self) -> &str {
        match self {
            AlertEvent::ExpiryWarning { domain, .. } => domain,
            AlertEvent::FetchFailure { domain, .. } => domain,
        }
    }

    /// Human-readable one-line summary.
    pub fn message(&self) -> String {
        match self {
            AlertEvent::ExpiryWarning {
                domain,
                window_days,
                not_after,
            } => format!(
                "The TLS certificate of {} expires within {} days (not valid after {})",
                domain,
                window_days,
                not_after.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            AlertEvent::FetchFailure { domain, reason } => format!(
                "The TLS certificate of {} can not be checked: {}",
                domain, reason
            ),
        }
    }
}

/// Destination for alert events.
///
/// Implementations must be safe for concurrent emission so the runner can be
/// swapped for a parallel variant without changing this contract.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one event.
    async fn emit(&self, event: &AlertEvent) -> Result<()>;

    /// Sink name for diagnostics.
    fn name(&self) -> &str;
}

/// Forwards each event to every configured sink.
///
/// A failing sink is logged and skipped; delivery only counts as failed when
/// every sink rejected the event.
pub struct FanoutSink {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for FanoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertSink for FanoutSink {
    async fn emit(&self, event: &AlertEvent) -> Result<()> {
        let mut tasks = Vec::new();

        for sink in &self.sinks {
            let task = async move {
                match sink.emit(event).await {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        tracing::error!("Failed to deliver alert via {}: {}", sink.name(), e);
                        Err(e)
                    }
                }
            };
            tasks.push(task);
        }

        let results = futures::future::join_all(tasks).await;

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        if success_count == 0 && !self.sinks.is_empty() {
            return Err(anyhow::anyhow!("All alert sinks failed"));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "fanout"
    }
}

/// Buffers events in memory. Used by tests and by callers that want to
/// merge events after a concurrent run.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<AlertEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub async fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AlertSink for MemorySink {
    async fn emit(&self, event: &AlertEvent) -> Result<()> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn warning() -> AlertEvent {
        AlertEvent::ExpiryWarning {
            domain: "example.com".to_string(),
            window_days: 14,
            not_after: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_event_message_expiry() {
        let msg = warning().message();
        assert!(msg.contains("example.com"));
        assert!(msg.contains("14 days"));
        assert!(msg.contains("2024-03-10"));
    }

    #[test]
    fn test_event_message_fetch_failure() {
        let event = AlertEvent::FetchFailure {
            domain: "bad.example.com".to_string(),
            reason: "connection refused".to_string(),
        };
        let msg = event.message();
        assert!(msg.contains("bad.example.com"));
        assert!(msg.contains("can not be checked"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&warning()).unwrap();
        assert!(json.contains("ExpiryWarning"));
        assert!(json.contains("example.com"));

        let back: AlertEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, warning());
    }

    #[tokio::test]
    async fn test_memory_sink_preserves_order() {
        let sink = MemorySink::new();
        let a = warning();
        let b = AlertEvent::FetchFailure {
            domain: "bad.example.com".to_string(),
            reason: "timeout".to_string(),
        };

        sink.emit(&a).await.unwrap();
        sink.emit(&b).await.unwrap();

        let events = sink.events().await;
        assert_eq!(events, vec![a, b]);
    }

    #[tokio::test]
    async fn test_fanout_delivers_to_all_sinks() {
        let mut fanout = FanoutSink::new();
        fanout.add_sink(Box::new(MemorySink::new()));
        fanout.add_sink(Box::new(MemorySink::new()));
        assert_eq!(fanout.sink_count(), 2);

        fanout.emit(&warning()).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_fanout_is_ok() {
        let fanout = FanoutSink::new();
        fanout.emit(&warning()).await.unwrap();
    }
}
