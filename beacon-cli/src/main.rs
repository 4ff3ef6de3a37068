use anyhow::{Context, Result};
use beacon_core::IceServerConfig;
use beacon_server::{RelayConfig, serve};
use clap::Parser;
use colored::*;
use std::net::{IpAddr, SocketAddr};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(about = "Peer-to-peer call signaling relay")]
struct Cli {
    #[arg(long, env = "BEACON_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Length of generated room tokens.
    #[arg(long, env = "BEACON_TOKEN_LENGTH", default_value_t = 5)]
    token_length: usize,

    /// Reject create/join from a connection already in a room.
    #[arg(long, env = "BEACON_SINGLE_ROOM")]
    single_room: bool,

    /// Do not tell senders when their message could not be delivered.
    #[arg(long)]
    silent_drops: bool,

    /// STUN/TURN urls announced to clients. Repeat or comma-separate.
    #[arg(long = "stun", env = "BEACON_STUN", value_delimiter = ',')]
    stun: Vec<String>,

    /// Fallback log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> RelayConfig {
        let defaults = RelayConfig::default();
        let ice_servers = if self.stun.is_empty() {
            defaults.ice_servers.clone()
        } else {
            vec![IceServerConfig::stun(self.stun)]
        };

        RelayConfig {
            token_length: self.token_length,
            single_room_per_connection: self.single_room,
            notify_delivery_failure: !self.silent_drops,
            ice_servers,
            ..defaults
        }
        .with_bind_addr(SocketAddr::new(self.host, self.port))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.into_config();
    config.validate().context("Invalid configuration")?;

    println!("{}", "📡 Starting Beacon signaling relay...".green().bold());
    println!("   🔌 Listening: ws://{}/ws", config.bind_addr);
    println!("   🔑 Room token length: {}", config.token_length);
    info!("Configuration: {:?}", config);

    serve(config).await
}
