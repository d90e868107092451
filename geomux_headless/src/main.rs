use clap::{CommandFactory, Parser};
use common::position::Coordinates;
use common::{Accuracy, LocationOptions};
use engine::GeolocationEngine;
use futures::StreamExt;
use provider_core::LocationProvider;
use simulated::SimulatedProvider;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file with the route the simulated provider replays,
    /// one "longitude,latitude" pair per line.
    #[arg(short, long)]
    route: String,
    /// Simulated speed in meters per second.
    #[arg(short, long, default_value_t = 2.8)]
    speed: f64,
    /// Milliseconds between simulated fixes.
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,
    /// Requested accuracy tier: best, high, medium, low or significant.
    #[arg(short, long)]
    accuracy: Option<String>,
    /// Resolve a single fix instead of observing continuously.
    #[arg(short, long)]
    one_shot: bool,
}

fn parse_accuracy(name: &str) -> Result<Accuracy, ()> {
    match name {
        "best" => Ok(Accuracy::Best),
        "high" => Ok(Accuracy::High),
        "medium" => Ok(Accuracy::Medium),
        "low" => Ok(Accuracy::Low),
        "significant" => Ok(Accuracy::Significant),
        other => {
            error!("Unknown accuracy tier: {other}");
            Err(())
        }
    }
}

fn read_route_from_file(file_path: &str) -> Result<Vec<Coordinates>, ()> {
    let mut rdr = csv::Reader::from_path(file_path).map_err(|e| {
        error!("Failed to open route file {file_path}: {e}");
    })?;
    let mut route = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            error!("Failed to read route record: {e}");
        })?;
        let longitude = record
            .get(0)
            .and_then(|v| f64::from_str(v).ok())
            .ok_or_else(|| error!("Route record without longitude"))?;
        let latitude = record
            .get(1)
            .and_then(|v| f64::from_str(v).ok())
            .ok_or_else(|| error!("Route record without latitude"))?;
        route.push(Coordinates::new(latitude, longitude));
    }
    debug!("length of route: {}", route.len());
    Ok(route)
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let route = read_route_from_file(&cli.route)?;
    if route.is_empty() {
        error!("Route file contains no waypoints");
        let _ = Cli::command().print_help();
        return Err(());
    }
    let provider = SimulatedProvider::new(
        &route,
        cli.speed,
        Duration::from_millis(cli.interval_ms),
    )
    .map_err(|e| {
        error!("Failed to create simulated provider: {e}");
    })?;
    let engine = GeolocationEngine::new(provider.clone() as Arc<dyn LocationProvider>);

    let options = LocationOptions {
        accuracy: cli
            .accuracy
            .as_deref()
            .map(parse_accuracy)
            .transpose()?,
        ..LocationOptions::default()
    };

    if cli.one_shot {
        let fix = engine.get(options).await.map_err(|e| {
            error!("One-shot request failed: {e}");
        })?;
        info!(
            "fix lat={:.6} lon={:.6} accuracy={:.1}m",
            fix.latitude, fix.longitude, fix.horizontal_accuracy
        );
        return Ok(());
    }

    info!("Observing, stop with ctrl-c...");
    let mut subscription = engine.observe(options).await;
    let mut previous: Option<Coordinates> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            delivery = subscription.next() => {
                match delivery {
                    Some(Ok(fix)) => {
                        let position = fix.coordinates();
                        match previous {
                            Some(last) => info!(
                                "fix lat={:.6} lon={:.6} moved={:.1}m bearing={:.0}",
                                fix.latitude,
                                fix.longitude,
                                geodesy::distance(&last, &position),
                                geodesy::bearing(&last, &position),
                            ),
                            None => info!("fix lat={:.6} lon={:.6}", fix.latitude, fix.longitude),
                        }
                        previous = Some(position);
                    }
                    Some(Err(e)) => error!("Location error: {e}"),
                    None => break,
                }
            }
        }
    }
    subscription.cancel().await;
    info!("Stopped");
    Ok(())
}
