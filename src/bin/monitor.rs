//! Terminal monitor for a running Pipewatch server.
//!
//! Polls the readings endpoint on a fixed interval and prints station status
//! and newly detected anomalies.
//!
//! Usage:
//!   monitor --url http://127.0.0.1:8000 --interval-ms 2000

use clap::Parser;
use pipewatch::{
    config::MonitorConfig,
    monitor::{ConnectionStatus, MonitorState, PollOutcome, Poller},
};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Parser, Debug)]
#[command(name = "monitor")]
#[command(about = "Poll a Pipewatch server and report station readings and anomalies")]
struct Args {
    /// Base URL of the Pipewatch server
    #[arg(short, long, env = "PIPEWATCH_URL", default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Polling interval in milliseconds
    #[arg(short, long, default_value = "2000")]
    interval_ms: u64,

    /// Consecutive failures before reporting the server as disconnected
    #[arg(long, default_value = "5")]
    max_errors: u32,

    /// Number of anomaly events kept in the log
    #[arg(long, default_value = "50")]
    log_size: usize,

    /// Request timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Stop after this many polls (0 = run until Ctrl+C)
    #[arg(long, default_value = "0")]
    polls: u64,
}

impl From<&Args> for MonitorConfig {
    fn from(args: &Args) -> Self {
        MonitorConfig {
            base_url: args.url.clone(),
            poll_interval: Duration::from_millis(args.interval_ms),
            max_consecutive_errors: args.max_errors,
            max_anomaly_log: args.log_size,
            request_timeout: Duration::from_millis(args.timeout_ms),
        }
    }
}

fn print_status(state: &MonitorState, outcome_error: Option<&str>) {
    match state.status() {
        ConnectionStatus::Connected => {
            let line: Vec<String> = state
                .stations()
                .map(|(name, reading)| match reading {
                    Some(r) if r.is_anomaly => format!("{} ANOMALY({:.2})", name, r.anomaly_score),
                    Some(_) => format!("{} ok", name),
                    None => format!("{} --", name),
                })
                .collect();
            println!(
                "[{}] {} | active {}/3, anomalous {} | session anomalies {}",
                state.status(),
                line.join(" | "),
                state.active_stations(),
                state.anomaly_stations(),
                state.total_anomalies_session()
            );
        }
        status => {
            println!(
                "[{}] {} consecutive failure(s): {}",
                status,
                state.consecutive_errors(),
                outcome_error.unwrap_or("unknown error")
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipewatch=info,monitor=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = MonitorConfig::from(&args);
    let poller = Poller::new(&config)?;
    let mut state = MonitorState::from_config(&config);

    println!("Pipewatch Monitor");
    println!("=================\n");
    println!("Polling {} every {:?}", poller.url(), config.poll_interval);
    println!();

    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut polls = 0u64;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let outcome = tokio::select! {
            outcome = async {
                ticker.tick().await;
                poller.poll().await
            } => outcome,
            _ = &mut shutdown => {
                println!("\nStopping monitor");
                break;
            }
        };

        let error = match &outcome {
            PollOutcome::Failure(e) => Some(e.clone()),
            PollOutcome::Success(_) => None,
        };
        let new_events = state.apply(outcome);

        print_status(&state, error.as_deref());
        for event in &new_events {
            tracing::warn!(
                station = %event.location,
                score = event.anomaly_score,
                "anomaly detected at {}",
                event.timestamp
            );
            println!(
                "  ⚠ {} at {} (score {:.2})",
                event.location, event.timestamp, event.anomaly_score
            );
            for (field, value) in event.sensors.iter() {
                println!("      {:<16} {:>10.3} {}", field.label(), value, field.unit());
            }
        }

        polls += 1;
        if args.polls > 0 && polls >= args.polls {
            break;
        }
    }

    println!();
    println!("Session anomalies: {}", state.total_anomalies_session());
    println!("Logged events: {}", state.anomaly_log_len());
    if let Some(last) = state.last_update() {
        println!("Last update: {}", last);
    }

    Ok(())
}
