// Runner - sequence the check over the domain list
//
// Pure sequencing: fetch, evaluate, emit. All decision logic lives in the
// fetcher and the evaluator, so a concurrent variant can replace this one
// without touching their contracts.

use crate::alerts::{AlertEvent, AlertSink};
use crate::evaluator::CertificateExpiration;
use crate::fetcher::CertificateFetcher;
use crate::Result;
use chrono::{DateTime, Utc};

/// Per-run counters, mostly for the final log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub warnings: usize,
    pub failures: usize,
    pub skipped: usize,
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Drives one stateless pass over a domain list.
pub struct Runner<'a> {
    fetcher: &'a dyn CertificateFetcher,
    sink: &'a dyn AlertSink,
    window_days: u32,
    clock: Clock,
}

impl<'a> Runner<'a> {
    pub fn new(
        fetcher: &'a dyn CertificateFetcher,
        sink: &'a dyn AlertSink,
        window_days: u32,
    ) -> Self {
        Self {
            fetcher,
            sink,
            window_days,
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the clock. Tests pin it to get reproducible runs.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Check every domain in list order. Blank entries are skipped; a failed
    /// domain produces exactly one failure event and never aborts the batch.
    pub async fn run(&self, domains: &[String]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for domain in domains {
            let domain = domain.trim();
            if domain.is_empty() {
                summary.skipped += 1;
                continue;
            }

            summary.checked += 1;

            let expiration = match self.fetcher.fetch(domain).await {
                Ok(not_after) => CertificateExpiration::KnownAt(not_after),
                Err(err) => {
                    summary.failures += 1;
                    self.emit(AlertEvent::FetchFailure {
                        domain: domain.to_string(),
                        reason: err.to_string(),
                    })
                    .await;
                    continue;
                }
            };

            let now = (self.clock)();
            if expiration.due_for_notification(now, self.window_days) {
                summary.warnings += 1;
                if let CertificateExpiration::KnownAt(not_after) = expiration {
                    self.emit(AlertEvent::ExpiryWarning {
                        domain: domain.to_string(),
                        window_days: self.window_days,
                        not_after,
                    })
                    .await;
                }
            }
        }

        Ok(summary)
    }

    async fn emit(&self, event: AlertEvent) {
        if let Err(e) = self.sink.emit(&event).await {
            tracing::error!(
                "Alert delivery via {} failed for {}: {}",
                self.sink.name(),
                event.domain(),
                e
            );
        }
    }
}
