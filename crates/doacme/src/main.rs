// # doacme - DigitalOcean record reconciler
//
// The doacme binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the DigitalOcean record store
// 4. Running one reconciliation and printing its summary
//
// All reconciliation logic lives in doacme-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Provider
// - `DOACME_TOKEN`: DigitalOcean API token (required)
// - `DOACME_API_URL`: API base URL (optional, defaults to the public API)
// - `DOACME_MODE`: `live` (default) or `dry-run`
//
// ### Record
// - `DOACME_DOMAIN`: Fully-qualified domain, e.g. `www.example.com` (required)
// - `DOACME_RECORDTYPE`: Record type, e.g. `TXT` (required)
// - `DOACME_RECORDNAME`: Record name, e.g. `_acme-challenge` (required)
// - `DOACME_RECORDDATA`: Record data (required for create/update)
// - `DOACME_RECORDTTL`: TTL in seconds (default 3600)
// - `DOACME_RECORDPRIORITY`, `DOACME_RECORDPORT`, `DOACME_RECORDWEIGHT`: optional
//
// ### Intents
// - `DOACME_DELETE`, `DOACME_CREATE`, `DOACME_UPDATE`, `DOACME_READ`: booleans
//
// ### Logging
// - `DOACME_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export DOACME_DOMAIN=example.com
// export DOACME_TOKEN=your_token
// export DOACME_RECORDTYPE=TXT
// export DOACME_RECORDNAME=_acme-challenge
// export DOACME_RECORDDATA=abc123
// export DOACME_CREATE=true
// export DOACME_UPDATE=true
//
// doacme
// ```

use anyhow::{Context, Result};
use doacme_core::report::summary_line;
use doacme_core::{DoacmeConfig, Intents, RecordConfig, Reconciler};
use doacme_provider_digitalocean::DigitalOceanStore;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Environment variable prefix
const ENV_PREFIX: &str = "DOACME";

/// Exit codes for different termination scenarios
///
/// - 0: Success, including no-op outcomes
/// - 1: Configuration error (no remote call was made)
/// - 2: Runtime error (lookup, permission, or mutation failure)
#[derive(Debug, Clone, Copy)]
enum DoacmeExitCode {
    /// Reconciliation finished
    Success = 0,
    /// Configuration error
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<DoacmeExitCode> for ExitCode {
    fn from(code: DoacmeExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Process settings that are not part of the reconciliation itself
struct Settings {
    config: DoacmeConfig,
    api_url: Option<String>,
    dry_run: bool,
    log_level: Level,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps a full variable name to its value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(&format!("{}_{}", ENV_PREFIX, name));
        let string = |name: &str| var(name).unwrap_or_default();

        let mut record = RecordConfig::new(string("RECORDTYPE"), string("RECORDNAME"));
        record.data = var("RECORDDATA").filter(|data| !data.is_empty());
        if let Some(ttl) = parse_number(&var, "RECORDTTL")? {
            record.ttl = ttl;
        }
        record.priority = parse_number(&var, "RECORDPRIORITY")?;
        record.port = parse_number(&var, "RECORDPORT")?;
        record.weight = parse_number(&var, "RECORDWEIGHT")?;

        let intents = Intents {
            delete: parse_flag(&var, "DELETE")?,
            create: parse_flag(&var, "CREATE")?,
            update: parse_flag(&var, "UPDATE")?,
            read: parse_flag(&var, "READ")?,
        };

        let config =
            DoacmeConfig::new(string("DOMAIN"), string("TOKEN"), record).with_intents(intents);

        let dry_run = match var("MODE").unwrap_or_default().to_lowercase().as_str() {
            "" | "live" => false,
            "dry-run" | "dry_run" | "dryrun" => true,
            other => anyhow::bail!(
                "{}_MODE '{}' is not valid. Valid modes: live, dry-run",
                ENV_PREFIX,
                other
            ),
        };

        let log_level = match var("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            other => anyhow::bail!(
                "{}_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                ENV_PREFIX,
                other
            ),
        };

        Ok(Self {
            config,
            api_url: var("API_URL").filter(|url| !url.is_empty()),
            dry_run,
            log_level,
        })
    }
}

/// Parse an optional unsigned number
fn parse_number(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u32>> {
    match var(name).map(|s| s.trim().to_string()) {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value.parse().map(Some).with_context(|| {
            format!(
                "{}_{} must be a non-negative integer, got '{}'",
                ENV_PREFIX, name, value
            )
        }),
    }
}

/// Parse an optional boolean flag, absent meaning false
fn parse_flag(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<bool> {
    let Some(value) = var(name) else {
        return Ok(false);
    };

    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => anyhow::bail!(
            "{}_{} must be a boolean (true/false), got '{}'",
            ENV_PREFIX,
            name,
            other
        ),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DoacmeExitCode::ConfigError.into();
        }
    };

    // Validate before anything touches the network
    if let Err(e) = settings.config.validate() {
        eprintln!("{}", e);
        return DoacmeExitCode::ConfigError.into();
    }

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DoacmeExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DoacmeExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(settings)).into()
}

/// Run one reconciliation and print its summary
async fn run(settings: Settings) -> DoacmeExitCode {
    let mut store = match DigitalOceanStore::new(settings.config.token.clone(), settings.dry_run) {
        Ok(store) => store,
        Err(e) => {
            error!("{}", e);
            return DoacmeExitCode::ConfigError;
        }
    };
    if let Some(url) = settings.api_url {
        store = store.with_base_url(url);
    }
    if settings.dry_run {
        warn!("DigitalOcean store running in DRY-RUN mode - no changes will be made");
    }

    let reconciler = match Reconciler::new(Box::new(store), &settings.config) {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("{}", e);
            return DoacmeExitCode::ConfigError;
        }
    };

    info!(
        "Reconciling {} record {} in {}",
        reconciler.desired().record_type,
        reconciler.desired().name,
        reconciler.domain()
    );

    match reconciler.run().await {
        Ok(outcome) => {
            println!("{}", summary_line(&outcome, reconciler.domain()));
            DoacmeExitCode::Success
        }
        Err(e) => {
            error!("{}", e);
            if e.is_config() {
                DoacmeExitCode::ConfigError
            } else {
                DoacmeExitCode::RuntimeError
            }
        }
    }
}
