mod import;
mod plan;
mod properties;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use proproute_routing::RouteAssembler;
use proproute_sheets::{PropertyStore, SheetsClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "proproute-cli")]
#[command(about = "Property catalog and visit-route planning from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every property in the catalog sheet
    Properties,
    /// Bulk-import a .csv, .xlsx or .xls file into the catalog sheet
    Import {
        /// File to import
        file: PathBuf,
    },
    /// Plan a visiting route and print the itinerary
    Plan {
        /// Starting latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Starting longitude
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Local start time (HH:MM)
        #[arg(long, default_value = "09:00")]
        start: String,
        /// Property IDs to visit
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("proproute-cli: run with --help to list commands");
        return Ok(());
    };

    let config = proproute_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = SheetsClient::new(
        &config.sheets,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let store = PropertyStore::new(client);

    match command {
        Commands::Properties => properties::run_properties(&store).await,
        Commands::Import { file } => import::run_import(&store, &file).await,
        Commands::Plan {
            lat,
            lng,
            start,
            ids,
        } => {
            let routing = RouteAssembler::from_config(&config)?;
            plan::run_plan(&store, &routing, lat, lng, &start, &ids).await
        }
    }
}
