use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wifi_bridge::{
    BridgeConfig, Platform, PlatformServices, WifiManager,
    sim::{Fixture, SimulatedAndroid, SimulatedHotspot},
    wifi::wifi_list_to_json,
};

/// Drive the WiFi facade against a simulated Android or iOS device
#[derive(Parser, Debug)]
#[command(
    name = "wifi-bridge",
    about = "Drive the cross-platform WiFi facade against a simulated Android or iOS device.",
    long_about = None,
    version = env!("CARGO_PKG_VERSION"),
)]
struct Args {
    /// Platform to simulate (android or ios)
    #[arg(long, default_value = "android")]
    platform: Platform,

    /// Android API level
    #[arg(long, default_value_t = 33)]
    sdk: u32,

    /// iOS major version
    #[arg(long, default_value_t = 17)]
    ios_version: u32,

    /// JSON file describing networks in range and saved networks
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// JSON file with bridge settings (connect_timeout_secs, join_once)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds to wait for an association outcome; overrides the config file
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List cached scan results
    Scan,
    /// Request a fresh scan, then list results
    Rescan,
    /// Connect to a network
    Connect {
        ssid: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        wep: bool,
        /// Treat SSID as a prefix (iOS)
        #[arg(long)]
        prefix: bool,
    },
    /// Print the SSID of the current network
    Current,
    /// Print whether any network path is usable
    Status,
    /// Turn the radio on or off
    Enable { state: Toggle },
    /// Drop the current association
    Disconnect {
        /// Remove the hotspot configuration for this prefix instead (iOS)
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Remove a saved network
    Remove { ssid: String },
    /// Bind app traffic to WiFi
    ForceWifi { state: Toggle },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let fixture = match &args.fixture {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("reading fixture {}", path.display()))?;
            Fixture::from_json(&json).wrap_err("parsing fixture")?
        }
        None => Fixture::demo(),
    };
    debug!(networks = fixture.networks.len(), "fixture loaded");

    let services = match args.platform {
        Platform::Android => {
            PlatformServices::Android(Arc::new(SimulatedAndroid::from_fixture(args.sdk, &fixture)))
        }
        Platform::Ios => PlatformServices::Ios(Arc::new(SimulatedHotspot::from_fixture(
            args.ios_version,
            &fixture,
        ))),
    };
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("reading config {}", path.display()))?;
            BridgeConfig::from_json(&json).wrap_err("parsing config")?
        }
        None => BridgeConfig::default(),
    };
    if let Some(secs) = args.timeout_secs {
        config.connect_timeout_secs = secs;
    }
    debug!(?config, "bridge config");
    let manager = WifiManager::for_platform(services, config);

    run(&manager, args.command).await
}

async fn run(manager: &WifiManager, command: Command) -> Result<()> {
    match command {
        Command::Scan => {
            let entries = manager.load_wifi_list().await?;
            println!("{}", wifi_list_to_json(&entries)?);
        }
        Command::Rescan => {
            let entries = manager.re_scan_and_load_wifi_list().await?;
            println!("{}", wifi_list_to_json(&entries)?);
        }
        Command::Connect {
            ssid,
            password,
            wep,
            prefix,
        } => {
            let protected = password.is_some();
            let password = password.map(SecretString::from);
            match (prefix, protected) {
                (true, true) => {
                    manager
                        .connect_to_protected_ssid_prefix(&ssid, password, wep)
                        .await?
                }
                (true, false) => manager.connect_to_ssid_prefix(&ssid).await?,
                (false, _) => manager.connect_to_protected_ssid(&ssid, password, wep).await?,
            }
            println!("connected to {}", manager.get_current_wifi_ssid().await?);
        }
        Command::Current => println!("{}", manager.get_current_wifi_ssid().await?),
        Command::Status => println!("{}", manager.connection_status().await?),
        Command::Enable { state } => {
            manager.set_enabled(state.is_on()).await?;
            println!("wifi enabled: {}", manager.is_enabled().await?);
        }
        Command::Disconnect { prefix: Some(prefix) } => {
            manager.disconnect_from_ssid(&prefix).await?
        }
        Command::Disconnect { prefix: None } => manager.disconnect().await?,
        Command::Remove { ssid } => {
            println!("{}", manager.is_remove_wifi_network(&ssid).await?)
        }
        Command::ForceWifi { state } => manager.force_wifi_usage(state.is_on()).await?,
    }
    Ok(())
}
