use anyhow::Context;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use flight_loads::app::ports::CapacitySourcePort;
use flight_loads::config::{ApiCredentials, Config};
use flight_loads::constants::{APP_ID_ENV, APP_KEY_ENV};
use flight_loads::infra::csv_capacity::CsvCapacitySource;
use flight_loads::infra::file_output_adapter::CsvFileOutput;
use flight_loads::infra::json_file_source::JsonFileFlightSource;
use flight_loads::infra::schiphol_client::SchipholFlightSource;
use flight_loads::logging;
use flight_loads::pipeline::{Pipeline, RunSummary};

#[derive(Parser)]
#[command(name = "flight_loads")]
#[command(about = "Estimate passenger load per Schiphol flight")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Directory for the rolling JSON log file
    #[arg(long, default_value = "logs", global = true)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, transform and store one day of flights
    Run {
        /// Schedule date (YYYY-MM-DD); defaults to yesterday
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Transform a saved raw flight list without calling the API
    Transform {
        /// JSON file with a flight array or an API page
        #[arg(long)]
        flights: PathBuf,
        /// Schedule date the file belongs to; defaults to yesterday
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Override the reference table directory
        #[arg(long)]
        capacity_dir: Option<PathBuf>,
        /// Override the output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Load and validate the capacity reference tables
    CheckReference {
        /// Override the reference table directory
        #[arg(long)]
        capacity_dir: Option<PathBuf>,
    },
}

/// Schedule date and output timestamp. Without an explicit date the job
/// processes yesterday, stamped with the time it was queried.
fn query_datetime(date: Option<NaiveDate>) -> (NaiveDate, NaiveDateTime) {
    match date {
        Some(date) => (date, NaiveDateTime::new(date, NaiveTime::default())),
        None => {
            let run_at = Local::now().naive_local() - Duration::days(1);
            (run_at.date(), run_at)
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Run results for {}:", summary.schedule_date);
    println!("   Run id: {}", summary.run_id);
    println!("   Flights fetched: {}", summary.fetched_flights);
    println!("   Enriched: {}", summary.stats.enriched_rows);
    println!("   Skipped: {}", summary.stats.skipped_rows);
    println!(
        "   Estimated passengers: {:.0}",
        summary.stats.total_estimated_passengers
    );
    for (tier, count) in &summary.stats.capacity_tiers {
        println!("   Capacity via {}: {}", tier, count);
    }
    println!("   Output file: {}", summary.receipt.location);
    println!("   SHA-256: {}", summary.receipt.sha256);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&cli.log_dir);

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Run { date } => {
            println!("🚀 Running flight load pipeline...");
            let (date, run_at) = query_datetime(date);
            let credentials = ApiCredentials::from_env().with_context(|| {
                format!("{} and {} must be set", APP_ID_ENV, APP_KEY_ENV)
            })?;

            let pipeline = Pipeline::new(
                Box::new(SchipholFlightSource::new(config.api.clone(), credentials)?),
                Box::new(CsvCapacitySource::new(config.reference.clone())),
                Box::new(CsvFileOutput::new(config.output.clone())),
            )
            .with_policy(config.transform.row_policy);

            match pipeline.run(date, run_at).await {
                Ok(summary) => print_summary(&summary),
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Transform {
            flights,
            date,
            capacity_dir,
            output_dir,
        } => {
            println!("🔧 Transforming {}...", flights.display());
            if let Some(dir) = capacity_dir {
                config.reference.dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            let (date, run_at) = query_datetime(date);

            let pipeline = Pipeline::new(
                Box::new(JsonFileFlightSource::new(flights)),
                Box::new(CsvCapacitySource::new(config.reference.clone())),
                Box::new(CsvFileOutput::new(config.output.clone())),
            )
            .with_policy(config.transform.row_policy);

            let summary = pipeline.run(date, run_at).await?;
            print_summary(&summary);
        }
        Commands::CheckReference { capacity_dir } => {
            if let Some(dir) = capacity_dir {
                config.reference.dir = dir;
            }
            let tables = CsvCapacitySource::new(config.reference.clone())
                .load_capacity()
                .await?;
            println!("✅ Reference tables in {} are valid", config.reference.dir.display());
            println!("   Airline capacities: {}", tables.airline_cap().len());
            println!("   Aircraft capacities: {}", tables.aircraft_cap().len());
            println!("   Load factors: {}", tables.plf().len());
            println!(
                "   Fallbacks: {} seats, {}% load",
                tables.average_capacity(),
                tables.average_plf()
            );
        }
    }

    Ok(())
}
