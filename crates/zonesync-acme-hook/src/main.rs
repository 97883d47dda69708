// # zonesync-acme-hook - certbot auth hook
//
// Publishes an ACME DNS-01 validation token into an existing
// `_acme-challenge` TXT record, then waits for the new value to become
// visible through the system resolver.
//
// Intended to run as `certbot --manual-auth-hook`; certbot provides the
// domain and the token in its standard environment variables.
//
// ## Configuration
//
// - `CERTBOT_DOMAIN`: domain under validation (set by certbot)
// - `CERTBOT_VALIDATION`: validation token (set by certbot)
// - `ZONESYNC_API_TOKEN`: Cloudflare API token (required)
// - `ZONESYNC_ZONE_ID`: Cloudflare zone ID (required)
// - `ZONESYNC_TAG`: optional exact comment narrowing the record query
// - `ZONESYNC_CONFIRM_ATTEMPTS`: confirmation retry budget (default 10)
// - `ZONESYNC_CONFIRM_DELAY_SECS`: delay before each lookup (default 10)
// - `ZONESYNC_MODE`: "dry-run" to log the patch instead of sending it
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Exit status
//
// Exits 0 when the token was published, whether or not visibility was
// confirmed in time: a confirmation timeout only means this hook stopped
// waiting — the certificate issuer may still observe the token later.
// Any store, lookup, or configuration failure exits non-zero.

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::config::AcmeConfig;
use zonesync_core::engine::AcmeFlow;
use zonesync_core::verify::ConvergenceVerifier;
use zonesync_lookup_system::SystemLookup;
use zonesync_store_cloudflare::CloudflareStore;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum HookExitCode {
    Published = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_token: String,
    zone_id: String,
    domain: String,
    validation_token: String,
    tag: Option<String>,
    confirm_attempts: usize,
    confirm_delay_secs: u64,
    log_level: String,
    dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: required("ZONESYNC_API_TOKEN")?,
            zone_id: required("ZONESYNC_ZONE_ID")?,
            domain: required("CERTBOT_DOMAIN")?,
            validation_token: required("CERTBOT_VALIDATION")?,
            tag: env::var("ZONESYNC_TAG").ok().filter(|tag| !tag.is_empty()),
            confirm_attempts: parse_env("ZONESYNC_CONFIRM_ATTEMPTS", 10)?,
            confirm_delay_secs: parse_env("ZONESYNC_CONFIRM_DELAY_SECS", 10)?,
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            dry_run: env::var("ZONESYNC_MODE").unwrap_or_default().to_lowercase() == "dry-run",
        })
    }
}

/// Read a required environment variable with an actionable error
fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => anyhow::bail!("environment variable {} must be specified", name),
    }
}

/// Parse a numeric environment variable, with a default when unset
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} '{}' is not a valid number: {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return HookExitCode::ConfigError.into();
        }
    };

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
        return HookExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return HookExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_hook(config).await {
            Ok(()) => HookExitCode::Published,
            Err(e) => {
                error!("auth hook error: {e}");
                HookExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Publish the validation token and confirm its visibility
async fn run_hook(config: Config) -> Result<()> {
    if config.dry_run {
        warn!("running in dry-run mode - no records will be modified");
    }

    let store = CloudflareStore::new(config.api_token.clone(), config.zone_id.clone())?
        .with_dry_run(config.dry_run);
    let verifier = ConvergenceVerifier::new(Box::new(SystemLookup::new()));

    let flow = AcmeFlow::new(
        Box::new(store),
        verifier,
        AcmeConfig {
            domain: config.domain.clone(),
            token: config.validation_token.clone(),
            tag: config.tag.clone(),
            confirm_attempts: config.confirm_attempts,
            confirm_delay_secs: config.confirm_delay_secs,
        },
    )?;

    info!("publishing validation token for {}", config.domain);

    // Both outcomes are success for the hook: a timeout only means we
    // stopped waiting before propagation finished.
    let _outcome = flow.run().await?;
    Ok(())
}
