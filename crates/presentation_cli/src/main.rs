//! Distance matrix CLI
//!
//! Command-line front end for the distance matrix client.

#![allow(clippy::print_stdout)]

mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use integration_distance_matrix::{
    Avoid, DistanceMatrixClient, DistanceMatrixConfig, DistanceMatrixRequest,
    HttpDistanceMatrixClient, TrafficModel, TransitMode, TransitRoutingPreference, TravelMode,
    Units,
};
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Distance matrix CLI
#[derive(Debug, Parser)]
#[command(name = "distance-matrix")]
#[command(author, version, about = "Travel distance and time between sets of locations", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Origin location (repeatable)
    #[arg(short = 'o', long = "origin")]
    origins: Vec<String>,

    /// Destination location (repeatable)
    #[arg(short = 'd', long = "destination")]
    destinations: Vec<String>,

    /// Travel mode: driving, walking, bicycling, transit
    #[arg(short, long)]
    mode: Option<TravelMode>,

    /// Language of the returned addresses
    #[arg(long)]
    language: Option<String>,

    /// Region bias (ccTLD code)
    #[arg(long)]
    region: Option<String>,

    /// Feature to avoid: tolls, highways, ferries, indoor
    #[arg(long)]
    avoid: Option<Avoid>,

    /// Unit system: metric, imperial
    #[arg(long)]
    units: Option<Units>,

    /// Departure time ("now" or unix seconds)
    #[arg(long)]
    departure_time: Option<String>,

    /// Arrival time (unix seconds)
    #[arg(long)]
    arrival_time: Option<String>,

    /// Preferred transit vehicle (repeatable): bus, subway, train, tram, rail
    #[arg(long)]
    transit_mode: Vec<TransitMode>,

    /// Transit routing preference: less_walking, fewer_transfers
    #[arg(long)]
    transit_routing_preference: Option<TransitRoutingPreference>,

    /// Traffic model: best_guess, pessimistic, optimistic
    #[arg(long)]
    traffic_model: Option<TrafficModel>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service base URL (overrides the configuration file)
    #[arg(long)]
    base_url: Option<String>,

    /// API key (overrides the configuration file)
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Client-side rate limit in requests per second
    #[arg(long)]
    requests_per_second: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the decoded response as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn request(&self) -> DistanceMatrixRequest {
        DistanceMatrixRequest {
            origins: self.origins.clone(),
            destinations: self.destinations.clone(),
            mode: self.mode,
            language: self.language.clone(),
            region: self.region.clone(),
            avoid: self.avoid,
            units: self.units,
            departure_time: self.departure_time.clone(),
            arrival_time: self.arrival_time.clone(),
            transit_mode: self.transit_mode.clone(),
            transit_routing_preference: self.transit_routing_preference,
            traffic_model: self.traffic_model,
        }
    }

    /// Load the configuration file, if any, then apply flag overrides
    fn load_config(&self) -> anyhow::Result<DistanceMatrixConfig> {
        let mut config = match &self.config {
            Some(path) => read_config_file(path)?,
            None => DistanceMatrixConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(SecretString::from(api_key.clone()));
        }
        if let Some(rps) = self.requests_per_second {
            config.requests_per_second = rps;
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }

        Ok(config)
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<DistanceMatrixConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.load_config()?;
    info!(?config, "Loaded configuration");

    let client = HttpDistanceMatrixClient::new(&config)?;
    let request = cli.request();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            interrupt.cancel();
        }
    });

    let response = client.execute(&cancel, &request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", output::render_table(&request, &response));
    }

    Ok(())
}
