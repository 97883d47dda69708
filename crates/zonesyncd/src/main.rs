// # zonesyncd - dynamic DNS daemon
//
// Reconciles every DNS record tagged with a configured prefix against the
// host's current public addresses, on a fixed interval, forever.
//
// The daemon is a thin integration layer: it reads configuration from the
// environment, wires the Cloudflare store adapter and the HTTP address
// source into the core engine, and runs it. All reconciliation policy lives
// in zonesync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `ZONESYNC_API_TOKEN`: Cloudflare API token (required)
// - `ZONESYNC_ZONE_ID`: Cloudflare zone ID (required)
// - `ZONESYNC_TAG_PREFIX`: comment prefix selecting managed records (required)
// - `ZONESYNC_INTERVAL`: reconciliation interval, e.g. "5m" or "300s" (required)
// - `ZONESYNC_FAMILIES`: comma-separated families to resolve (default "4,6")
// - `ZONESYNC_IP_V4_URL` / `ZONESYNC_IP_V6_URL`: discovery endpoints
//   (default ipinfo.io / v6.ipinfo.io)
// - `ZONESYNC_MODE`: "dry-run" to log patches instead of sending them
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export ZONESYNC_API_TOKEN=your_token
// export ZONESYNC_ZONE_ID=your_zone
// export ZONESYNC_TAG_PREFIX=ddns/
// export ZONESYNC_INTERVAL=5m
//
// zonesyncd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::config::SyncConfig;
use zonesync_core::engine::SyncEngine;
use zonesync_core::traits::AddressFamily;
use zonesync_ip_http::{DEFAULT_V4_URL, DEFAULT_V6_URL, HttpAddressSource};
use zonesync_store_cloudflare::CloudflareStore;

/// Exit codes for different termination scenarios
///
/// - 0: clean shutdown
/// - 1: configuration or startup error
/// - 2: runtime error
#[derive(Debug, Clone, Copy)]
enum SyncdExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<SyncdExitCode> for ExitCode {
    fn from(code: SyncdExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_token: String,
    zone_id: String,
    tag_prefix: String,
    interval: Duration,
    families: Vec<AddressFamily>,
    v4_url: String,
    v6_url: String,
    log_level: String,
    dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let interval_raw = required("ZONESYNC_INTERVAL")?;
        let interval = humantime::parse_duration(&interval_raw).map_err(|e| {
            anyhow::anyhow!(
                "ZONESYNC_INTERVAL '{}' is not a valid duration (use e.g. 5m or 300s): {}",
                interval_raw,
                e
            )
        })?;

        let families = match env::var("ZONESYNC_FAMILIES") {
            Ok(raw) => raw
                .split(',')
                .map(|part| part.parse::<AddressFamily>())
                .collect::<zonesync_core::Result<Vec<_>>>()?,
            Err(_) => vec![AddressFamily::V4, AddressFamily::V6],
        };

        Ok(Self {
            api_token: required("ZONESYNC_API_TOKEN")?,
            zone_id: required("ZONESYNC_ZONE_ID")?,
            tag_prefix: required("ZONESYNC_TAG_PREFIX")?,
            interval,
            families,
            v4_url: env::var("ZONESYNC_IP_V4_URL").unwrap_or_else(|_| DEFAULT_V4_URL.to_string()),
            v6_url: env::var("ZONESYNC_IP_V6_URL").unwrap_or_else(|_| DEFAULT_V6_URL.to_string()),
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            dry_run: env::var("ZONESYNC_MODE").unwrap_or_default().to_lowercase() == "dry-run",
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.api_token.len() < 20 {
            anyhow::bail!(
                "ZONESYNC_API_TOKEN appears too short ({} chars). \
                Cloudflare tokens are typically 40 characters; verify the token.",
                self.api_token.len()
            );
        }

        if self.tag_prefix.is_empty() {
            anyhow::bail!(
                "ZONESYNC_TAG_PREFIX cannot be empty. \
                Set it via: export ZONESYNC_TAG_PREFIX=ddns/"
            );
        }

        if self.interval < Duration::from_secs(10) {
            anyhow::bail!(
                "ZONESYNC_INTERVAL must be at least 10 seconds. Got: {:?}",
                self.interval
            );
        }

        if self.families.is_empty() {
            anyhow::bail!("ZONESYNC_FAMILIES must name at least one address family");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Read a required environment variable with an actionable error
fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => anyhow::bail!("environment variable {} must be specified", name),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return SyncdExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e}");
        return SyncdExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return SyncdExitCode::ConfigError.into();
    }

    info!("starting zonesyncd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return SyncdExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => SyncdExitCode::CleanShutdown,
            Err(e) => {
                error!("daemon error: {e}");
                SyncdExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire the components and run the reconciliation engine forever
async fn run_daemon(config: Config) -> Result<()> {
    if config.dry_run {
        warn!("running in dry-run mode - no records will be modified");
    }

    let store = CloudflareStore::new(config.api_token.clone(), config.zone_id.clone())?
        .with_dry_run(config.dry_run);
    let addresses = HttpAddressSource::with_urls(&config.v4_url, &config.v6_url)?;

    let engine = SyncEngine::new(
        Box::new(store),
        Box::new(addresses),
        SyncConfig {
            tag_prefix: config.tag_prefix.clone(),
            interval_secs: config.interval.as_secs(),
            families: config.families.clone(),
        },
    )?;

    info!(
        "reconciling records tagged '{}' every {}",
        config.tag_prefix,
        humantime::format_duration(config.interval)
    );
    engine.run().await?;
    Ok(())
}
