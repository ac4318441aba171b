//! Book store service CLI server
//!
//! ```sh
//! # Run with default config (~/.config/bookstore-service/config.toml)
//! bookstore-service
//!
//! # Custom config path
//! bookstore-service --config /etc/bookstore-service/config.toml
//!
//! # Override the port
//! bookstore-service --api-port 8081
//!
//! # Validate config without starting
//! bookstore-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use bookstore_service::config::AppConfig;
use bookstore_service::server::{init_tracing, ServerHandle, ServerOptions};

/// REST backend for book stores, their employees, customers and books.
#[derive(Parser, Debug)]
#[command(
    name = "bookstore-service",
    version,
    about = "REST backend for book stores",
    long_about = "Book store service: REST API over SQLite for book stores, \
                  their employees, customers and books.\n\n\
                  Default config: ~/.config/bookstore-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BOOKSTORE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(bookstore_service::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Backend     : {:?}", config.database.backend);
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
