//! CLI binary serving MAC address to hostname lookups.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod config;
mod error;

use config::{ConfigLayer, DEFAULT_CONFIG_DIR, Port, Settings};
use error::Error;

use std::path::PathBuf;

use clap::Parser;
use mac2hostname_http::{HttpServer, router};
use mac2hostname_resolver::{HostnameResolver, ResolverConfig};
use mac2hostname_sql::SqlStore;
use mac2hostname_sql_direct::DirectSqlStore;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Parser)]
#[command(name = "mac2hostname", version, about = "Simple hostname generator", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MAC2HOSTNAME_PORT")]
    port: Option<u16>,

    /// Full path to the database file
    #[arg(short, long, env = "MAC2HOSTNAME_DB")]
    db: Option<PathBuf>,

    /// String used to compose the final hostname
    #[arg(
        short = 'H',
        long,
        visible_alias = "hostname_base",
        env = "MAC2HOSTNAME_HOSTNAME_BASE"
    )]
    hostname_base: Option<String>,

    /// Directory searched for config.yaml, config.yml or config.json
    #[arg(long, default_value = DEFAULT_CONFIG_DIR, env = "MAC2HOSTNAME_CONFIG_DIR")]
    config_dir: PathBuf,
}

impl Args {
    fn flags(&self) -> ConfigLayer {
        ConfigLayer {
            port: self.port.map(Port::Number),
            db: self.db.clone(),
            hostname_base: self.hostname_base.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.flags(), &args.config_dir)?;
    info!("settings: {:?}", settings);

    // Create shared shutdown token
    let shutdown_token = CancellationToken::new();

    // Set up signal handlers
    let signal_shutdown_token = shutdown_token.clone();
    tokio::spawn(async move {
        wait_for_signal().await;

        info!("Shutting down");
        signal_shutdown_token.cancel();
    });

    run(settings, shutdown_token).await
}

async fn run(settings: Settings, shutdown_token: CancellationToken) -> Result<(), Error> {
    let connection = DirectSqlStore::new(&settings.db_path).connect().await?;
    let resolver =
        HostnameResolver::new(connection, ResolverConfig::new(settings.default_group)).await?;

    let server = HttpServer::new(settings.listen_addr);
    let handle = server.start(router(resolver)).await?;

    tokio::select! {
        () = shutdown_token.cancelled() => server.shutdown().await,
        _ = handle => info!("http server stopped on its own"),
    }

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM"),
                _ = sigint.recv() => info!("Received SIGINT"),
            }
        }
        _ => {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received interrupt signal");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received interrupt signal");
}
