// Error types for certwatch
//
// Per-domain fetch failures are structured values, never panics: every
// variant carries the domain it belongs to so the runner can turn it into
// exactly one reportable event.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// A failure to determine a certificate's expiration date.
///
/// All variants are recoverable at the run level: the affected domain is
/// reported and skipped, the batch continues.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS resolution failed for the hostname
    #[error("DNS resolution failed for {domain}: {reason}")]
    DnsResolution { domain: String, reason: String },

    /// Connection attempt timed out
    #[error("Connection to {domain}:443 timed out after {timeout:?}")]
    ConnectionTimeout { domain: String, timeout: Duration },

    /// TCP connection could not be established
    #[error("Connection to {domain}:443 failed: {source}")]
    Connection {
        domain: String,
        #[source]
        source: io::Error,
    },

    /// TLS handshake failed or was rejected by the server
    #[error("TLS handshake with {domain} failed: {reason}")]
    Handshake { domain: String, reason: String },

    /// Handshake succeeded but the server presented no certificates
    #[error("No certificate received from {domain}")]
    NoCertificate { domain: String },

    /// Certificate received but its validity window could not be parsed
    #[error("Certificate for {domain} could not be parsed: {reason}")]
    CertificateParse { domain: String, reason: String },

    /// Domain string was empty or blank
    #[error("Empty domain name")]
    EmptyDomain,
}

impl FetchError {
    /// The domain this failure belongs to, if any.
    pub fn domain(&self) -> Option<&str> {
        match self {
            FetchError::DnsResolution { domain, .. }
            | FetchError::ConnectionTimeout { domain, .. }
            | FetchError::Connection { domain, .. }
            | FetchError::Handshake { domain, .. }
            | FetchError::NoCertificate { domain }
            | FetchError::CertificateParse { domain, .. } => Some(domain),
            FetchError::EmptyDomain => None,
        }
    }
}
