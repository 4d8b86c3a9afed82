//! CFTP Server Binary
//!
//! Starts the sequential TCP server for CFTP.

use std::path::PathBuf;

use clap::Parser;
use cftp::{Config, Server};
use tracing_subscriber::{fmt, EnvFilter};

/// CFTP Server
#[derive(Parser, Debug)]
#[command(name = "cftp-server")]
#[command(about = "Single-port file transfer server")]
#[command(version)]
struct Args {
    /// Address to bind (any interface when omitted)
    #[arg(short, long, default_value = "")]
    address: String,

    /// Listen port, no privileged ports allowed
    #[arg(short, long, default_value_t = cftp::config::DEFAULT_PORT)]
    port: u16,

    /// Directory received files are written into
    #[arg(long, default_value_os_t = std::env::temp_dir())]
    staging_dir: PathBuf,

    /// Directory files are served from for `get`
    #[arg(long, default_value = ".")]
    serve_dir: PathBuf,

    /// Read timeout in milliseconds (0 blocks forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 blocks forever)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cftp=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    // Build config from args
    let config = Config::builder()
        .address(&args.address)
        .port(args.port)
        .staging_dir(&args.staging_dir)
        .serve_dir(&args.serve_dir)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    if let Err(e) = config.validate_server() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("CFTP Server v{}", cftp::VERSION);
    tracing::info!("Staging directory: {}", config.staging_dir.display());
    tracing::info!("Serving from: {}", config.serve_dir.display());

    let server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Bind error: {}", e);
            std::process::exit(1);
        }
    };

    // Set up Ctrl+C handler
    match server.shutdown_handle() {
        Ok(handle) => {
            let result = ctrlc::set_handler(move || {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
                handle.shutdown();
            });
            if let Err(e) = result {
                tracing::warn!("Could not install Ctrl+C handler: {}", e);
            }
        }
        Err(e) => tracing::warn!("Could not create shutdown handle: {}", e),
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
