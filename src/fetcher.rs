// Certificate Fetcher - extract the notAfter instant of a domain's TLS
// certificate
//
// One scoped connection per domain: resolve, connect, handshake, read the
// leaf certificate, drop the stream. Verification is disabled for the
// capture connection because an expired or broken certificate must still be
// observable; the point of the run is to report those.

use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use rustls::ClientConfig;
use rustls_pki_types::ServerName;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

const TLS_PORT: u16 = 443;

/// Source of certificate expiration data for a domain.
///
/// The runner only depends on this trait; tests drive it with a stub.
#[async_trait]
pub trait CertificateFetcher: Send + Sync {
    /// Fetch the leaf certificate's notAfter instant for `domain:443`.
    async fn fetch(&self, domain: &str) -> Result<DateTime<Utc>, FetchError>;
}

/// Fetcher backed by a real TLS connection.
pub struct TlsFetcher {
    connect_timeout: Duration,
    connector: TlsConnector,
}

/// Accepts any server certificate. The capture connection must complete the
/// handshake even against expired, self-signed, or mismatched certificates.
#[derive(Debug)]
struct NoVerifier;

impl rustls::client::danger::ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls_pki_types::CertificateDer<'_>,
        _intermediates: &[rustls_pki_types::CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls_pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls_pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls_pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP521_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}

impl TlsFetcher {
    /// Create a fetcher with the given connect timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        let config = ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerifier))
            .with_no_client_auth();

        Self {
            connect_timeout,
            connector: TlsConnector::from(Arc::new(config)),
        }
    }

    async fn resolve(&self, domain: &str) -> Result<IpAddr, FetchError> {
        // Literal IPs skip the resolver
        if let Ok(ip) = domain.parse::<IpAddr>() {
            return Ok(ip);
        }

        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        let response = resolver
            .lookup_ip(domain)
            .await
            .map_err(|e| FetchError::DnsResolution {
                domain: domain.to_string(),
                reason: e.to_string(),
            })?;

        response.iter().next().ok_or_else(|| FetchError::DnsResolution {
            domain: domain.to_string(),
            reason: "no address records".to_string(),
        })
    }

    /// Extract notAfter from a DER-encoded leaf certificate.
    fn parse_not_after(domain: &str, der_bytes: &[u8]) -> Result<DateTime<Utc>, FetchError> {
        let (_, cert) =
            X509Certificate::from_der(der_bytes).map_err(|e| FetchError::CertificateParse {
                domain: domain.to_string(),
                reason: format!("{:?}", e),
            })?;

        let ts = cert.validity().not_after.timestamp();

        DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| FetchError::CertificateParse {
            domain: domain.to_string(),
            reason: format!("notAfter out of range: {}", ts),
        })
    }
}

#[async_trait]
impl CertificateFetcher for TlsFetcher {
    async fn fetch(&self, domain: &str) -> Result<DateTime<Utc>, FetchError> {
        if domain.trim().is_empty() {
            return Err(FetchError::EmptyDomain);
        }

        let ip = self.resolve(domain).await?;
        let addr = SocketAddr::new(ip, TLS_PORT);

        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| FetchError::ConnectionTimeout {
                domain: domain.to_string(),
                timeout: self.connect_timeout,
            })?
            .map_err(|e| FetchError::Connection {
                domain: domain.to_string(),
                source: e,
            })?;

        let server_name = ServerName::try_from(domain)
            .map_err(|_| FetchError::Handshake {
                domain: domain.to_string(),
                reason: "invalid DNS name for SNI".to_string(),
            })?
            .to_owned();

        let tls_stream = timeout(self.connect_timeout, self.connector.connect(server_name, stream))
            .await
            .map_err(|_| FetchError::ConnectionTimeout {
                domain: domain.to_string(),
                timeout: self.connect_timeout,
            })?
            .map_err(|e| FetchError::Handshake {
                domain: domain.to_string(),
                reason: e.to_string(),
            })?;

        // Stream is dropped here; only the leaf's DER bytes survive
        let (_io, connection) = tls_stream.into_inner();
        let leaf = connection
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or_else(|| FetchError::NoCertificate {
                domain: domain.to_string(),
            })?;

        Self::parse_not_after(domain, leaf.as_ref())
    }
}
