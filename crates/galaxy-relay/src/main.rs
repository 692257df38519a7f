//! galaxy-relay binary: load config, set up logging, serve.

use std::path::PathBuf;

use clap::Parser;
use galaxy_relay::RelaySettings;

#[derive(Parser)]
#[command(name = "galaxy-relay", about = "Room relay for the Galaxy shared space")]
struct Args {
    /// Port to listen on (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Drop rooms and their objects once the last member leaves.
    #[arg(long)]
    evict_empty_rooms: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Config errors are reported after logging is up.
    let (mut config, config_err) = match galaxy_config::load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Default::default(), Some(e)),
    };

    let directive = match args.log_level.as_deref() {
        Some(level) => format!("galaxy_relay={level}"),
        None => config.logging.directive("galaxy_relay"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directive.into()),
        )
        .init();

    if let Some(e) = config_err {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
    }
    tracing::debug!(config = %galaxy_config::config_to_json(&config), "Effective config");

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.evict_empty_rooms {
        config.server.evict_empty_rooms = true;
    }

    let listener = match galaxy_relay::bind(&config.server.listen_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.server.listen_addr(), error = %e, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };

    galaxy_relay::serve(listener, RelaySettings::from_config(&config)).await;
}
