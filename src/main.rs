//! CLI entry point for the occupancy extract processor.
//!
//! Provides subcommands for processing a single daily extract, downloading
//! and processing a date range, and emitting the bus route-name reference.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use oam_processor::fetch::{BasicClient, fetch_extract};
use oam_processor::mode::Mode;
use oam_processor::output::write_json;
use oam_processor::process::pipeline::process_batch;
use oam_processor::routes::{PublicRoutes, route_names};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "oam_processor")]
#[command(about = "Normalize transit occupancy extracts into trip JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an already-downloaded daily extract
    Process {
        /// Transit mode of the extract
        #[arg(short, long, value_enum)]
        mode: Mode,

        /// Date of the file in YYYYMMDD format
        date: String,

        /// Directory containing the raw extract files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,

        /// Directory for processed JSON output
        #[arg(short, long, default_value = "processed")]
        output_dir: PathBuf,

        /// GTFS routes.txt used to restrict bus routes
        #[arg(long, default_value = "routes.txt")]
        routes: PathBuf,
    },
    /// Download and process every extract in a date range
    Fetch {
        /// Transit mode to download
        #[arg(short, long, value_enum)]
        mode: Mode,

        /// Start date in YYYYMMDD format
        start_date: String,

        /// End date in YYYYMMDD format, inclusive
        end_date: String,

        /// Directory for downloaded raw files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,

        /// Directory for processed JSON output
        #[arg(short, long, default_value = "processed")]
        output_dir: PathBuf,

        /// GTFS routes.txt used to restrict bus routes
        #[arg(long, default_value = "routes.txt")]
        routes: PathBuf,

        /// Keep the downloaded raw files after processing
        #[arg(long, default_value_t = false)]
        keep_raw: bool,
    },
    /// Emit the route-name reference mapping from a GTFS routes.txt
    Routes {
        /// GTFS routes.txt to read
        #[arg(short, long, default_value = "routes.txt")]
        input: PathBuf,

        /// JSON file to write
        #[arg(short, long, default_value = "busroutes.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/oam_processor.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("oam_processor.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            mode,
            date,
            data_dir,
            output_dir,
            routes,
        } => {
            let date = parse_date(&date)?;
            let input = data_dir.join(raw_file_name(mode, date));
            process_one(mode, date, &input, &output_dir, &routes)?;
        }
        Commands::Fetch {
            mode,
            start_date,
            end_date,
            data_dir,
            output_dir,
            routes,
            keep_raw,
        } => {
            fetch_range(
                mode,
                parse_date(&start_date)?,
                parse_date(&end_date)?,
                &data_dir,
                &output_dir,
                &routes,
                keep_raw,
            )
            .await?;
        }
        Commands::Routes { input, output } => {
            let names = route_names(&input)?;
            write_json(&output, &names)?;
            info!(routes = names.len(), output = %output.display(), "Route names saved");
        }
    }

    Ok(())
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .with_context(|| format!("invalid date {value:?}, expected YYYYMMDD"))
}

fn raw_file_name(mode: Mode, date: NaiveDate) -> String {
    format!("{}_{}.txt", mode.tag(), date.format("%Y%m%d"))
}

/// Processes one raw extract file into its JSON outputs.
#[tracing::instrument(skip(input, output_dir, routes), fields(mode = %mode, date = %date))]
fn process_one(
    mode: Mode,
    date: NaiveDate,
    input: &Path,
    output_dir: &Path,
    routes: &Path,
) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    // Only the bus pipeline consumes the GTFS route reference.
    let public_routes = if mode == Mode::Bus {
        Some(PublicRoutes::load(routes)?)
    } else {
        None
    };

    let service_date = date.format("%Y-%m-%d").to_string();
    let batch = process_batch(mode, &raw, Some(&service_date), public_routes.as_ref())?;

    let tag = mode.tag();
    let ymd = date.format("%Y%m%d");
    let trips_path = output_dir.join(format!("{tag}_{ymd}.json"));
    write_json(&trips_path, &batch.trips)?;
    info!(trips = batch.trips.len(), output = %trips_path.display(), "Trips saved");

    if let Some(stops) = &batch.stops {
        let stops_path = output_dir.join(format!("{tag}_{ymd}_stops.json"));
        write_json(&stops_path, stops)?;
        info!(stops = stops.len(), output = %stops_path.display(), "Stop dictionary saved");
    }

    Ok(())
}

/// Downloads and processes each date in the range. A failed or missing
/// download logs and skips that date; processing errors are fatal.
async fn fetch_range(
    mode: Mode,
    start: NaiveDate,
    end: NaiveDate,
    data_dir: &Path,
    output_dir: &Path,
    routes: &Path,
    keep_raw: bool,
) -> Result<()> {
    let client = BasicClient::new();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let mut current = start;
    while current <= end {
        let raw_path = data_dir.join(raw_file_name(mode, current));
        info!(mode = %mode, date = %current, "Downloading extract");

        match fetch_extract(&client, mode, current).await {
            Ok(bytes) => {
                std::fs::write(&raw_path, &bytes)
                    .with_context(|| format!("writing {}", raw_path.display()))?;

                process_one(mode, current, &raw_path, output_dir, routes)?;

                if !keep_raw {
                    std::fs::remove_file(&raw_path)
                        .with_context(|| format!("deleting {}", raw_path.display()))?;
                }
            }
            Err(e) => {
                error!(mode = %mode, date = %current, error = %e, "Skipping date");
            }
        }

        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    info!(mode = %mode, start = %start, end = %end, "Finished date range");
    Ok(())
}
