// CLI - command line interface and argument parsing

use clap::Parser;
use std::path::PathBuf;

/// certwatch - TLS certificate expiration checker
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(name = "certwatch")]
#[command(about = "Check TLS certificate expiration and send notifications", long_about = None)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Domains file, one hostname per line (overrides config)
    #[arg(short = 'f', long = "domains-file", value_name = "FILE")]
    pub domains_file: Option<PathBuf>,

    /// Warning window in days (overrides config)
    #[arg(short = 'd', long = "days", value_name = "DAYS")]
    pub window_days: Option<u32>,

    /// Connect timeout in seconds (overrides config)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// Log alerts only; never send email even if configured
    #[arg(long = "no-email")]
    pub no_email: bool,
}
