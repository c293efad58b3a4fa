use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use adresse_resolver::apis::{KartverketClient, SeeiendomClient};
use adresse_resolver::app::resolve_use_case::ResolveUseCase;
use adresse_resolver::config::Config;
use adresse_resolver::domain::{LocationAddress, LocationObject};
use adresse_resolver::logging::init_logging;
use adresse_resolver::observability;

#[derive(Parser)]
#[command(name = "adresse-resolver")]
#[command(about = "Registry-verified resolution of Norwegian street addresses")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single location given on the command line
    Resolve {
        /// Visiting address street, e.g. "Havnegata 19 A"
        #[arg(long)]
        street: Option<String>,
        /// Visiting address postcode
        #[arg(long)]
        postcode: Option<String>,
        /// Postal address street
        #[arg(long)]
        postal_street: Option<String>,
        /// Postal address postcode
        #[arg(long)]
        postal_postcode: Option<String>,
    },
    /// Resolve a JSON file containing an array of location records
    Batch {
        /// Path to the input file
        #[arg(long)]
        input: PathBuf,
        /// Delay between successive resolutions in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();
    observability::metrics::init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Falling back to default configuration: {}", e);
            Config::default()
        }
    };

    match cli.command {
        Commands::Resolve {
            street,
            postcode,
            postal_street,
            postal_postcode,
        } => {
            let location = LocationObject {
                visiting_address: make_address(street, postcode),
                postal_address: make_address(postal_street, postal_postcode),
            };

            let use_case = build_use_case(&config, None)?;
            match use_case.resolve_location(&location).await {
                Some(resolved) => println!("{}", serde_json::to_string_pretty(&resolved)?),
                None => println!("No verified address found"),
            }
        }
        Commands::Batch { input, delay_ms } => {
            let locations = load_locations(&input)?;
            let use_case = build_use_case(&config, delay_ms)?;

            let results = use_case.resolve_batch(&locations).await;
            let matched = results.iter().filter(|r| r.is_some()).count();

            println!("\n📊 Batch results for {}:", input.display());
            println!("   Total locations: {}", locations.len());
            println!("   Resolved: {}", matched);
            println!("   Unresolved: {}", locations.len() - matched);
            println!("{}", serde_json::to_string_pretty(&results)?);

            if let Some(rendered) = observability::metrics::render() {
                debug!("metrics snapshot:\n{}", rendered);
            }
        }
    }

    Ok(())
}

fn build_use_case(config: &Config, delay_ms: Option<u64>) -> Result<ResolveUseCase> {
    let registry = Arc::new(KartverketClient::new(&config.kartverket)?);
    let property_search = Arc::new(SeeiendomClient::new(&config.seeiendom)?);
    let delay = Duration::from_millis(delay_ms.unwrap_or(config.resolver.batch_delay_ms));
    Ok(ResolveUseCase::new(registry, property_search, delay))
}

fn make_address(street: Option<String>, postcode: Option<String>) -> Option<LocationAddress> {
    if street.is_none() && postcode.is_none() {
        return None;
    }
    Some(LocationAddress { street, postcode })
}

fn load_locations(path: &Path) -> Result<Vec<LocationObject>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Input file '{}' is not a JSON array of locations", path.display()))
}
