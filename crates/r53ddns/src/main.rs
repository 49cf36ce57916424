// # r53ddns - Route53 dynamic DNS updater
//
// This binary is a thin integration layer. All update logic lives in
// r53ddns-core; this file only:
// 1. Parses the action (`install` or `run`)
// 2. Initializes logging
// 3. Loads configuration from environment variables
// 4. Wires the trace IP source and the Route53 provider into the engine
// 5. Maps the result to an exit code
//
// ## Configuration
//
// - `ROUTE53_HOSTED_ZONE_DNS_NAME`: Hosted zone DNS name (required for `run`)
// - `ROUTE53_MY_DNS_NAME`: Record to keep in sync (required for `run`)
// - `ROUTE53_TTL`: TTL in seconds (required for `run`)
// - `ROUTE53_TRACE_URL`: Trace endpoint (default: Cloudflare trace)
// - `ROUTE53_MODE`: `live` or `dry-run`
// - `ROUTE53_LOG_LEVEL`: trace, debug, info, warn, error
//
// AWS credentials and region come from the standard AWS environment
// (`AWS_PROFILE`, `AWS_ACCESS_KEY_ID`, instance roles, ...).
//
// ## Example
//
// ```bash
// export ROUTE53_HOSTED_ZONE_DNS_NAME=example.com
// export ROUTE53_MY_DNS_NAME=home.example.com
// export ROUTE53_TTL=300
//
// # crontab: */5 * * * * r53ddns run
// r53ddns run
// ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use r53ddns_core::{DdnsEngine, RunConfig, RunOutcome};
use r53ddns_ip_trace::TraceIpSource;
use r53ddns_provider_route53::Route53Provider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Environment variable selecting the log level
const ENV_LOG_LEVEL: &str = "ROUTE53_LOG_LEVEL";

/// Exit codes for different termination scenarios
///
/// - 0: Run completed (including "IP unavailable" and "record not found",
///   which are reported in the log)
/// - 1: Configuration or startup error
/// - 2: Runtime error (provider or network failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdaterExitCode {
    /// Normal completion
    Completed = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<UpdaterExitCode> for ExitCode {
    fn from(code: UpdaterExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command line
#[derive(Debug, Parser)]
#[command(
    name = "r53ddns",
    version,
    about = "Keep a Route53 A record in sync with this host's public IP"
)]
struct Cli {
    /// Action to perform
    #[arg(value_enum)]
    action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Set up the updater on this host
    Install,
    /// Check the public IP and update the record if it changed
    Run,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match parse_log_level(env::var(ENV_LOG_LEVEL).ok().as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return UpdaterExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdaterExitCode::ConfigError.into();
    }

    let code = match cli.action {
        Action::Install => install(),
        Action::Run => run(),
    };

    code.into()
}

fn install() -> UpdaterExitCode {
    info!("Install action selected; nothing to set up yet");
    UpdaterExitCode::Completed
}

fn run() -> UpdaterExitCode {
    let config = match RunConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return UpdaterExitCode::ConfigError;
        }
    };

    info!(
        "Checking {} in zone {} (ttl {}, mode {:?})",
        config.record_dns_name, config.hosted_zone_dns_name, config.ttl, config.mode
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdaterExitCode::RuntimeError;
        }
    };

    rt.block_on(async {
        match run_update(config).await {
            Ok(outcome) => {
                info!("Run finished: {}", describe(&outcome));
                UpdaterExitCode::Completed
            }
            Err(e) => {
                error!("Update failed: {:#}", e);
                UpdaterExitCode::RuntimeError
            }
        }
    })
}

/// Build the clients and run one update check
async fn run_update(config: RunConfig) -> Result<RunOutcome> {
    let dry_run = config.mode.is_dry_run();
    if dry_run {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }

    let ip_source = TraceIpSource::new(config.trace_url.clone());
    let provider = Route53Provider::from_env(dry_run).await;

    let engine = DdnsEngine::new(Box::new(ip_source), Box::new(provider), config)
        .context("invalid configuration")?;

    engine
        .run_once()
        .await
        .context("Route53 update check aborted")
}

fn describe(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Updated { .. } => "updated",
        RunOutcome::Unchanged { .. } => "unchanged",
        RunOutcome::IpUnavailable { .. } => "public IP unavailable",
        RunOutcome::RecordNotFound { .. } => "record not found",
    }
}

fn parse_log_level(value: Option<&str>) -> Result<Level> {
    match value.map(str::to_lowercase).as_deref() {
        None | Some("") | Some("info") => Ok(Level::INFO),
        Some("trace") => Ok(Level::TRACE),
        Some("debug") => Ok(Level::DEBUG),
        Some("warn") => Ok(Level::WARN),
        Some("error") => Ok(Level::ERROR),
        Some(other) => anyhow::bail!(
            "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            ENV_LOG_LEVEL,
            other
        ),
    }
}
