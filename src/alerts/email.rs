// Email Alert Sink - SMTP delivery using lettre

use crate::alerts::{AlertEvent, AlertSink};
use crate::config::EmailConfig;
use crate::Result;
use async_trait::async_trait;
use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Email alert sink
pub struct EmailSink {
    config: EmailConfig,
}

impl EmailSink {
    pub fn new(config: EmailConfig) -> Result<Self> {
        if config.to_addresses.is_empty() {
            return Err(anyhow::anyhow!("Email alerting enabled but no recipients configured"));
        }
        Ok(Self { config })
    }

    /// Build the email message for an event.
    fn build_message(&self, event: &AlertEvent) -> Result<Message> {
        let subject = match event {
            AlertEvent::ExpiryWarning { domain, .. } => {
                format!("[certwatch] Certificate expiry warning - {}", domain)
            }
            AlertEvent::FetchFailure { domain, .. } => {
                format!("[certwatch] Certificate check failed - {}", domain)
            }
        };

        let mut builder = Message::builder()
            .from(self.config.from_address.parse()?)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN);

        for to_addr in &self.config.to_addresses {
            builder = builder.to(to_addr.parse()?);
        }

        let body = format!("{}\n\n---\nGenerated by certwatch\n", event.message());

        Ok(builder.body(body)?)
    }

    fn get_transport(&self) -> Result<SmtpTransport> {
        let transport = if self.config.use_starttls {
            SmtpTransport::starttls_relay(&self.config.smtp_server)?
        } else {
            SmtpTransport::relay(&self.config.smtp_server)?
        };

        let mut transport = transport.port(self.config.smtp_port);

        // Credentials are optional; unauthenticated relays are a thing
        if !self.config.username.is_empty() && !self.config.password.is_empty() {
            let creds =
                Credentials::new(self.config.username.clone(), self.config.password.clone());
            transport = transport.credentials(creds);
        }

        Ok(transport.build())
    }
}

#[async_trait]
impl AlertSink for EmailSink {
    async fn emit(&self, event: &AlertEvent) -> Result<()> {
        let message = self.build_message(event)?;
        let transport = self.get_transport()?;

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(|e| anyhow::anyhow!("Failed to send email: {}", e))
        })
        .await??;

        Ok(())
    }

    fn name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            from_address: "alerts@example.com".to_string(),
            to_addresses: vec!["admin@example.com".to_string()],
            username: "user".to_string(),
            password: "pass".to_string(),
            use_starttls: true,
        }
    }

    #[test]
    fn test_email_sink_new() {
        assert!(EmailSink::new(create_test_config()).is_ok());
    }

    #[test]
    fn test_email_sink_rejects_empty_recipients() {
        let mut config = create_test_config();
        config.to_addresses.clear();
        assert!(EmailSink::new(config).is_err());
    }

    #[test]
    fn test_build_message_expiry_warning() {
        let sink = EmailSink::new(create_test_config()).unwrap();
        let event = AlertEvent::ExpiryWarning {
            domain: "example.com".to_string(),
            window_days: 14,
            not_after: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
        };

        let message = sink.build_message(&event).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("expiry warning"));
        assert!(formatted.contains("example.com"));
        assert!(formatted.contains("14 days"));
    }

    #[test]
    fn test_build_message_fetch_failure() {
        let sink = EmailSink::new(create_test_config()).unwrap();
        let event = AlertEvent::FetchFailure {
            domain: "bad.example.com".to_string(),
            reason: "connection refused".to_string(),
        };

        let message = sink.build_message(&event).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("check failed"));
        assert!(formatted.contains("connection refused"));
    }

    #[test]
    fn test_channel_name() {
        let sink = EmailSink::new(create_test_config()).unwrap();
        assert_eq!(sink.name(), "email");
    }
}
