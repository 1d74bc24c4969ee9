//! Query a running evacuation advisory server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use evac_cli::render::{render_advisory, render_zone};
use evac_cli::AdvisoryClient;
use evac_core::{GeoPoint, Severity};

/// Evacuation advisory client
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Advisory server URL
    #[arg(long, default_value = "http://localhost:3000", global = true)]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a location and print evacuation guidance
    Advise {
        /// Latitude; omit both to use the server's default location
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
        /// Print the raw JSON advisory
        #[arg(long)]
        json: bool,
    },
    /// List hazard zones, nearest first when a location is given
    Zones {
        #[arg(long)]
        severity: Option<Severity>,
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },
}

fn location(lat: Option<f64>, lon: Option<f64>) -> Result<Option<GeoPoint>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(GeoPoint::new(lat, lon)?)),
        _ => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = AdvisoryClient::new(&args.url);

    match args.command {
        Command::Advise { lat, lon, json } => {
            let state = client.advise(location(lat, lon)?).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                print!("{}", render_advisory(&state));
            }
        }
        Command::Zones { severity, lat, lon } => {
            let zones = client.zones(severity, location(lat, lon)?).await?;
            for listing in &zones {
                println!("{}", render_zone(listing));
            }
            println!("{} zone(s)", zones.len());
        }
    }

    Ok(())
}
