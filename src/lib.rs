//! certwatch checks the TLS certificate expiration of a list of domains and
//! raises alerts when a certificate expires within a configurable warning
//! window. Alerts are delivered through pluggable sinks (structured log,
//! email).

pub mod alerts;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod fetcher;
pub mod input;
pub mod runner;

// Re-export commonly used types
pub use crate::alerts::{AlertEvent, AlertSink};
pub use crate::cli::Args;
pub use crate::error::FetchError;
pub use crate::evaluator::CertificateExpiration;
pub use crate::fetcher::{CertificateFetcher, TlsFetcher};
pub use crate::runner::Runner;

/// Result type for certwatch operations
pub type Result<T> = anyhow::Result<T>;

/// Error type for certwatch operations
pub use anyhow::Error;
