//! CLI entry point for the office temperature monitor.
//!
//! Loads an uploaded CSV of temperature readings, lists its locations,
//! renders the dashboard views for a selection, and exports filtered data.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use office_temp_monitor::{
    chart::configure_fonts,
    config::Settings,
    dashboard::{Dashboard, GraphType},
    export::write_export,
    filter::{ALL_LOCATIONS, Selection, filter, locations, selector_options},
    ingest::{load, parse_timestamp},
    reading::Dataset,
    report::{print_json, print_summary, render_charts},
    source::read_source,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "office_temp_monitor")]
#[command(about = "Temperature dashboard for integrated office equipment sites", long_about = None)]
struct Cli {
    /// Optional JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable locations in a file
    Locations {
        /// Path to file, URL, or - for stdin
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Compute the dashboard for a location and render its charts
    Report {
        /// Path to file, URL, or - for stdin
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Location name, or 전체 for every location
        #[arg(short, long, default_value = ALL_LOCATIONS)]
        location: String,

        /// Which charts to draw
        #[arg(short, long, value_enum, default_value_t = GraphType::All)]
        graph: GraphType,

        /// Directory to write SVG charts to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the computed dashboard as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Reference time instead of the local clock (e.g. 2024-07-20T12:00:00)
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
    },
    /// Write the readings for a location to a BOM-prefixed CSV
    Export {
        /// Path to file, URL, or - for stdin
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Location name, or 전체 for every location
        #[arg(short, long, default_value = ALL_LOCATIONS)]
        location: String,

        /// Directory to write the CSV to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(value).ok_or_else(|| format!("cannot parse `{value}` as a date-time"))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = &settings.log_file_path;
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("office_temp_monitor.log"));

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

    match cli.command {
        Commands::Locations { source } => {
            let dataset = load_dataset(&source)?;
            for name in selector_options(&dataset) {
                println!("{name}");
            }
        }
        Commands::Report {
            source,
            location,
            graph,
            output_dir,
            json,
            now,
        } => {
            configure_fonts(settings.font_path.as_deref());

            let dataset = load_dataset(&source)?;
            let selection = select(&dataset, &location);
            let filtered = filter(&dataset, &selection);

            let now = now.unwrap_or_else(|| Local::now().naive_local());
            let dashboard = Dashboard::compute(&filtered, graph, now);

            print_summary(&selection, &dashboard, settings.high_temp_threshold);

            let dir = output_dir.unwrap_or(settings.output_dir);
            let charts = render_charts(&dir, &dashboard)?;
            info!(charts = charts.len(), dir = %dir.display(), "Report complete");

            if json {
                print_json(&dashboard)?;
            }
        }
        Commands::Export {
            source,
            location,
            output_dir,
        } => {
            let dataset = load_dataset(&source)?;
            let selection = select(&dataset, &location);
            let filtered = filter(&dataset, &selection);

            let dir = output_dir.unwrap_or(settings.output_dir);
            write_export(&dir, &selection, &filtered)?;
        }
    }

    Ok(())
}

/// Reads and cleans the uploaded file, failing the whole run on malformed input.
fn load_dataset(source: &str) -> Result<Dataset> {
    let bytes = read_source(source)?;
    let dataset = load(&bytes).with_context(|| format!("loading {source}"))?;
    info!(
        source,
        readings = dataset.len(),
        locations = locations(&dataset).len(),
        "Dataset loaded"
    );
    Ok(dataset)
}

fn select(dataset: &Dataset, label: &str) -> Selection {
    let selection = Selection::from_label(label);
    if let Selection::Location(name) = &selection {
        if !locations(dataset).contains(name) {
            warn!(location = %name, "Location not present in dataset");
        }
    }
    selection
}
