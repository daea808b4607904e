//! HTTP Server Binary for Pipewatch
//!
//! Serves simulated station readings for the dashboard to poll.
//!
//! Usage:
//!   cargo run --bin http_server -- --host 0.0.0.0 --port 8000 --seed 42

use clap::Parser;
use pipewatch::{config::ServerConfig, http::start_server, telemetry::STATION_NAMES};

#[derive(Parser, Debug)]
#[command(name = "Pipewatch HTTP Server")]
#[command(about = "HTTP API server for simulated pipeline station telemetry", long_about = None)]
struct Args {
    #[arg(short = 'H', long, env = "PIPEWATCH_HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, env = "PIPEWATCH_PORT", default_value = "8000")]
    port: u16,

    /// Seed the random source for reproducible readings
    #[arg(short, long, env = "PIPEWATCH_SEED")]
    seed: Option<u64>,

    /// Use the UTC hour instead of local time for diurnal patterns
    #[arg(long, env = "PIPEWATCH_UTC")]
    utc: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig { host: args.host, port: args.port, seed: args.seed, use_utc_clock: args.utc }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipewatch=info,http_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from(Args::parse());
    config.validate()?;

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║                 Pipewatch Pipeline Telemetry                   ║");
    println!("║                       HTTP API Server                          ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!();
    println!("Stations: {}", STATION_NAMES.join(", "));
    match config.seed {
        Some(seed) => println!("  - Random source: seeded ({})", seed),
        None => println!("  - Random source: OS entropy"),
    }
    println!("  - Clock: {}", if config.use_utc_clock { "UTC" } else { "local" });
    println!();

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        println!();
        println!("Shutdown signal received, stopping server...");
    };

    tokio::select! {
        result = start_server(&config) => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = shutdown_signal => {
            println!("Server shut down gracefully");
        }
    }

    Ok(())
}
