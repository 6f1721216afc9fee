use anyhow::Result;
use certwatch::alerts::{EmailSink, FanoutSink, LogSink};
use certwatch::config::Config;
use certwatch::{Args, Runner, TlsFetcher};
use clap::Parser;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let args = Args::parse();

    // Configuration file is optional; CLI flags override it either way
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(days) = args.window_days {
        config.check.window_days = days;
    }
    if let Some(timeout) = args.timeout_seconds {
        config.check.connect_timeout_seconds = timeout;
    }
    if let Some(ref domains_file) = args.domains_file {
        config.check.domains_file = domains_file.clone();
    }

    let domains = certwatch::input::load_domains(&config.check.domains_file)?;
    info!(
        "Checking {} domains, warning window {} days",
        domains.len(),
        config.check.window_days
    );

    // Sink stack: log always, email when configured and not suppressed
    let mut sink = FanoutSink::new();
    sink.add_sink(Box::new(LogSink::new()));

    if config.email_enabled() && !args.no_email {
        if let Some(email_config) = config.alerts.email.clone() {
            sink.add_sink(Box::new(EmailSink::new(email_config)?));
            info!("Email alerting enabled");
        }
    }

    let fetcher = TlsFetcher::new(Duration::from_secs(config.check.connect_timeout_seconds));
    let runner = Runner::new(&fetcher, &sink, config.check.window_days);

    let summary = runner.run(&domains).await?;

    info!(
        "Done: {} checked, {} warnings, {} failures, {} skipped",
        summary.checked, summary.warnings, summary.failures, summary.skipped
    );

    Ok(())
}
