// Configuration loading - TOML file with CLI overrides

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

/// Check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Days before expiry at which warnings begin firing
    pub window_days: u32,
    /// TLS connect timeout in seconds
    pub connect_timeout_seconds: u64,
    /// File with one domain per line
    pub domains_file: PathBuf,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            window_days: 14,
            connect_timeout_seconds: 30,
            domains_file: PathBuf::from("domains.txt"),
        }
    }
}

/// Alert delivery settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AlertsConfig {
    pub email: Option<EmailConfig>,
}

/// SMTP settings for the email sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub to_addresses: Vec<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub use_starttls: bool,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {:?}: {}", path.as_ref(), e)
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?;

        Ok(config)
    }

    /// Whether the email sink should be constructed.
    pub fn email_enabled(&self) -> bool {
        self.alerts
            .email
            .as_ref()
            .map(|email| email.enabled)
            .unwrap_or(false)
    }
}
