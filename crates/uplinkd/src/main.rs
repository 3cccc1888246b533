// # uplinkd - pre-start DDNS agent
//
// Thin integration layer over `uplink-core`:
// 1. Parse the command line and load the whitelist configuration
// 2. Set up tracing (stderr, or a file under --log-dir)
// 3. Load OVH credentials from the secrets directory
// 4. Optionally probe --check-url to guard against a double start
// 5. Run one agent pass and map the outcome to the exit contract
//
// ## Exit contract
//
// - 0: all records converged
// - 255: transient condition (network still settling); the supervisor may
//   re-run the agent later
// - 1: configuration/operator problem that will not self-resolve
//
// No business logic lives here; everything observable by tests is in the
// library crates.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use uplink_core::agent::{RunOutcome, UplinkAgent};
use uplink_core::config::AgentConfig;
use uplink_core::state::FileOwnershipStore;
use uplink_dns_hickory::HickoryDnsQuery;
use uplink_ip_http::HttpIpEcho;
use uplink_zone_ovh::{OvhCredentials, OvhZoneApi};

/// Timeout for the --check-url reachability probe
const CHECK_URL_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for gateway probes and the Wi-Fi association query
const INSPECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Exit codes for the supervisor's retry decision
#[derive(Debug, Clone, Copy)]
enum AgentExitCode {
    /// All records converged
    Success = 0,
    /// Operator problem; retrying will not help
    Fatal = 1,
    /// Transient condition; the supervisor may re-run the whole agent
    Retryable = 255,
}

impl From<AgentExitCode> for ExitCode {
    fn from(code: AgentExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&RunOutcome> for AgentExitCode {
    fn from(outcome: &RunOutcome) -> Self {
        match outcome {
            RunOutcome::Success => Self::Success,
            RunOutcome::Retryable(_) => Self::Retryable,
            RunOutcome::Fatal(_) => Self::Fatal,
        }
    }
}

/// Keep the managed domain's A/AAAA records aligned with the active uplink
#[derive(Debug, Parser)]
#[command(name = "uplinkd", version, about)]
struct Args {
    /// Target domain (e.g. home.example.net)
    #[arg(long)]
    domain: String,

    /// Directory holding the OVH credentials and the zone_records store
    #[arg(long)]
    secrets_dir: PathBuf,

    /// Whitelist configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this directory instead of stderr
    #[arg(short, long)]
    log_dir: Option<PathBuf>,

    /// Probe this URL before starting; abort if it already answers 200
    #[arg(long)]
    check_url: Option<String>,

    /// Update records even when resolution already matches
    #[arg(short, long)]
    force: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // The guard must outlive the run so buffered log lines are flushed
    let _log_guard = match init_tracing(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("logging setup error: {e}");
            return AgentExitCode::Fatal.into();
        }
    };

    info!("Begin run");

    // Strictly sequential execution: one thread is all the agent needs
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return AgentExitCode::Fatal.into();
        }
    };

    let outcome = rt.block_on(run(&args));
    match &outcome {
        RunOutcome::Success => info!("Run complete"),
        RunOutcome::Retryable(reason) => error!("{reason} (will retry)"),
        RunOutcome::Fatal(reason) => error!("{reason}"),
    }
    AgentExitCode::from(&outcome).into()
}

/// Set up the tracing subscriber; returns a flush guard for file logging
fn init_tracing(args: &Args) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    match &args.log_dir {
        Some(dir) if dir.is_dir() => {
            let appender = tracing_appender::rolling::never(dir, "uplinkd.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(writer)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
            Ok(Some(guard))
        }
        _ => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set tracing subscriber")?;
            Ok(None)
        }
    }
}

/// Assemble the collaborators and run one agent pass
async fn run(args: &Args) -> RunOutcome {
    match run_inner(args).await {
        Ok(outcome) => outcome,
        // Setup failures (bad config, unreadable secrets) are operator
        // problems by definition
        Err(e) => RunOutcome::Fatal(format!("{e:#}")),
    }
}

async fn run_inner(args: &Args) -> Result<RunOutcome> {
    if !args.secrets_dir.is_dir() {
        anyhow::bail!(
            "{} is not a directory or does not exist",
            args.secrets_dir.display()
        );
    }

    let config = load_config(args.config.as_deref())?;
    config.validate().context("invalid configuration")?;

    if let Some(url) = &args.check_url
        && let Err(e) = check_remote_service(url).await
    {
        return Ok(RunOutcome::Fatal(format!("{e:#}")));
    }

    let credentials = load_credentials(&args.secrets_dir)?;
    let zone = OvhZoneApi::with_default_timeout(credentials)?;
    let ownership = FileOwnershipStore::new(args.secrets_dir.join("zone_records")).await?;
    let dns = match HickoryDnsQuery::from_system_conf() {
        Ok(dns) => dns,
        Err(e) => {
            tracing::warn!("{e}; falling back to default resolver configuration");
            HickoryDnsQuery::with_defaults()
        }
    };
    let echo = HttpIpEcho::default_endpoint()?;

    let agent = UplinkAgent::new(
        build_inspector()?,
        Box::new(echo),
        Box::new(dns),
        Box::new(zone),
        Box::new(ownership),
    );

    Ok(agent
        .run_outcome(&config.router_whitelist, &args.domain, args.force)
        .await)
}

#[cfg(target_os = "linux")]
fn build_inspector() -> Result<Box<dyn uplink_core::traits::NetworkInspector>> {
    Ok(Box::new(uplink_net_linux::LinuxNetworkInspector::new(
        INSPECTOR_TIMEOUT,
    )))
}

#[cfg(not(target_os = "linux"))]
fn build_inspector() -> Result<Box<dyn uplink_core::traits::NetworkInspector>> {
    anyhow::bail!("network inspection is only supported on Linux");
}

/// Load the whitelist configuration; no file means an empty whitelist,
/// which validation rejects with a useful message
fn load_config(path: Option<&Path>) -> Result<AgentConfig> {
    let Some(path) = path else {
        return Ok(AgentConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse config file {}", path.display()))
}

/// Read the OVH credential files from the secrets directory
fn load_credentials(secrets_dir: &Path) -> Result<OvhCredentials> {
    let read = |name: &str| -> Result<String> {
        let path = secrets_dir.join(name);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read secret {}", path.display()))?;
        Ok(content.trim_end().to_string())
    };

    let endpoint = match read("ovh_endpoint") {
        Ok(endpoint) => endpoint,
        Err(_) => "ovh-eu".to_string(),
    };

    Ok(OvhCredentials {
        endpoint,
        application_key: read("ovh_application_key")?,
        application_secret: read("ovh_application_secret")?,
        consumer_key: read("ovh_consumer_key")?,
    })
}

/// Guard against a double start: fail if the service URL already answers
async fn check_remote_service(url: &str) -> Result<()> {
    info!("Check {url} accessibility");
    let client = reqwest::Client::builder()
        .timeout(CHECK_URL_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    match client.get(url).send().await {
        Ok(response) if response.status().as_u16() == 200 => {
            anyhow::bail!("URL already available")
        }
        Ok(response) => {
            info!("URL returned HTTP status: {}", response.status());
            Ok(())
        }
        Err(e) => {
            info!("URL not available: {e}");
            Ok(())
        }
    }
}
