use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use roku_bridge::{AppIndex, Config, DeviceDriver, LoggingHost, Platform, RokuClient, discovery};

/// Rokubridge - expose Roku devices as television accessories
#[derive(Parser)]
#[command(name = "rokubridge", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/rokubridge/config.toml)
    #[arg(short, long, env = "ROKU_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Device to connect to without discovery (repeatable)
    #[arg(long = "host")]
    hosts: Vec<String>,

    /// Seconds between state polls
    #[arg(long)]
    polling_interval: Option<u64>,

    /// Skip SSDP discovery
    #[arg(long)]
    no_discovery: bool,

    /// HTTP API port
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Search the network for Roku devices
    Discover {
        /// Seconds to wait for responses
        #[arg(short, long, default_value = "3")]
        timeout: u64,
    },
    /// Show a device's apps and their input identifiers
    Apps {
        /// Device host or ECP base URL
        address: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,roku_bridge=info",
        1 => "info,roku_bridge=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Discover { timeout } => cmd_discover(timeout).await,
            Command::Apps { address } => cmd_apps(&address).await,
        };
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if !cli.hosts.is_empty() {
        config.hosts = cli.hosts;
    }
    if let Some(secs) = cli.polling_interval {
        anyhow::ensure!(secs > 0, "polling interval must be at least one second");
        config.polling_interval = Duration::from_secs(secs);
    }
    if cli.no_discovery {
        config.discovery.enabled = false;
    }
    if let Some(port) = cli.port {
        config.api_server.port = port;
    }

    tracing::info!(
        hosts = ?config.hosts,
        discovery = config.discovery.enabled,
        polling_interval_secs = config.polling_interval.as_secs(),
        "starting Roku bridge"
    );
    tracing::debug!(?config, "loaded configuration");

    Platform::new(config, Arc::new(LoggingHost))
        .run()
        .await?;

    Ok(())
}

/// Print every device that answers an SSDP search
async fn cmd_discover(timeout: u64) -> anyhow::Result<()> {
    let devices = discovery::discover(Duration::from_secs(timeout)).await?;
    if devices.is_empty() {
        println!("No Roku devices found");
        return Ok(());
    }

    for device in devices {
        let client = RokuClient::new(&device.location)?;
        match client.device_info().await {
            Ok(info) => println!(
                "{}  {}  {} ({})",
                device.location, info.name, info.model_name, info.serial_number
            ),
            Err(e) => println!("{}  (device info unavailable: {e})", device.location),
        }
    }
    Ok(())
}

/// Print a device's app index
async fn cmd_apps(address: &str) -> anyhow::Result<()> {
    let client = RokuClient::new(address)?;
    let index = AppIndex::build(&client.apps().await?);

    println!("{:>12}  {:<24}  {:<6}  NAME", "IDENTIFIER", "APP ID", "TYPE");
    for app in index.all() {
        println!(
            "{:>12}  {:<24}  {:<6}  {}",
            app.id, app.roku_app_id, app.app_type, app.name
        );
    }
    Ok(())
}
