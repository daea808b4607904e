//! Pipewatch - simulated pipeline station telemetry
//!
//! Offline calibration run: generates many rounds of readings at a fixed
//! simulated time and reports the observed anomaly rates per station.

use chrono::{Local, TimeZone, Timelike};
use clap::Parser;
use pipewatch::telemetry::{
    generate_scored_reading,
    statistics::{effective_anomaly_rate, hour_multiplier},
    RandomSource, STATION_NAMES,
};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "pipewatch")]
#[command(about = "Calibrate the simulated anomaly rates of the Pipewatch generator")]
struct Args {
    /// Number of rounds; each round produces one reading per station
    #[arg(short, long, default_value = "10000")]
    rounds: u64,

    /// Seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated hour of day (0-23); defaults to the current local hour
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,
}

#[derive(Debug, Default)]
struct StationTally {
    readings: u64,
    anomalies: u64,
    forced: u64,
    threshold_only: u64,
    score_sum: f64,
}

impl StationTally {
    fn rate(&self, count: u64) -> f64 {
        if self.readings == 0 {
            0.0
        } else {
            count as f64 / self.readings as f64 * 100.0
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipewatch=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let now = Local::now();
    let hour = args.hour.unwrap_or_else(|| now.hour());
    let simulated = Local
        .with_ymd_and_hms(2024, 1, 15, hour, 30, 0)
        .earliest()
        .ok_or("simulated time does not exist in the local time zone")?;

    let mut source = match args.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };

    println!("Pipewatch Generator Calibration");
    println!("===============================\n");
    println!(
        "Rounds: {}  Hour: {:02}:00  Diurnal multiplier: {:.1}x",
        args.rounds,
        hour,
        hour_multiplier(hour)
    );
    println!();

    let mut tallies: Vec<(&str, StationTally)> =
        STATION_NAMES.iter().map(|name| (*name, StationTally::default())).collect();

    let start = Instant::now();
    for _ in 0..args.rounds {
        for (name, tally) in tallies.iter_mut() {
            let scored = generate_scored_reading(*name, &simulated, &mut source);
            tally.readings += 1;
            if scored.verdict.is_anomaly {
                tally.anomalies += 1;
                tally.score_sum += scored.verdict.score;
                if scored.verdict.forced {
                    tally.forced += 1;
                } else {
                    tally.threshold_only += 1;
                }
            }
        }
    }
    let elapsed = start.elapsed();

    println!("{:-<86}", "");
    println!(
        "{:<10} {:>12} {:>12} {:>12} {:>14} {:>12} {:>10}",
        "Station", "Anomaly(%)", "Forced(%)", "Thresh(%)", "Expected(%)", "Mean score", "Count"
    );
    println!("{:-<86}", "");
    for (name, tally) in &tallies {
        let mean_score =
            if tally.anomalies > 0 { tally.score_sum / tally.anomalies as f64 } else { 0.0 };
        println!(
            "{:<10} {:>12.3} {:>12.3} {:>12.3} {:>14.3} {:>12.2} {:>10}",
            name,
            tally.rate(tally.anomalies),
            tally.rate(tally.forced),
            tally.rate(tally.threshold_only),
            effective_anomaly_rate(name, hour) * 100.0,
            mean_score,
            tally.anomalies
        );
    }
    println!("{:-<86}", "");

    let total = args.rounds * STATION_NAMES.len() as u64;
    println!(
        "\nGenerated {} readings in {:.3} ms ({:.0} readings/sec)",
        total,
        elapsed.as_secs_f64() * 1000.0,
        total as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    Ok(())
}
