//! CLI entry point for the accident aggregation pipeline.
//!
//! Provides subcommands that emit each dashboard view as chart-ready JSON
//! (or CSV) for a user-selected year range.

use accident_pipeline::loader::{Dataset, YearRange};
use accident_pipeline::output::{build_report, export_csv, to_json};
use accident_pipeline::pipeline::types::RowOrder;
use accident_pipeline::pipeline::{kpi, map, monthly, yearly};
use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "accident_pipeline")]
#[command(about = "Aggregates the aviation accident dataset into dashboard tables", long_about = None)]
struct Cli {
    /// Path to the accident dataset CSV
    #[arg(short, long, default_value = "accidentes_data.csv", global = true)]
    input: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-year accident counts, top-3 annotation years, casualty sums
    Summary {
        #[command(flatten)]
        range: RangeArgs,

        /// Optional CSV file to write the per-year casualty rows to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// The four KPI series over the selected year range
    Kpi {
        #[command(flatten)]
        range: RangeArgs,

        /// Optional CSV file to write the KPI rows to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Month x category cross tabulation for the stacked bar charts
    Months {
        #[command(flatten)]
        range: RangeArgs,

        /// Which categorical column to cross-tabulate against
        #[arg(short, long, value_enum, default_value = "aircraft")]
        dimension: Dimension,

        /// Keep calendar month order instead of the dashboard's
        /// sort-by-total-ascending default
        #[arg(long, default_value_t = false)]
        calendar: bool,
    },
    /// Country markers for the accident map (always the full dataset)
    Map,
    /// Every view in one JSON payload, as the dashboard consumes it
    Report {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Args)]
struct RangeArgs {
    /// First year of the inclusive range (default: earliest in the data)
    #[arg(long)]
    min_year: Option<i32>,

    /// Last year of the inclusive range (default: latest in the data)
    #[arg(long)]
    max_year: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Dimension {
    Aircraft,
    Continent,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/accident_pipeline.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("accident_pipeline.log"));

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

    let dataset = Dataset::from_csv_path(&cli.input)?;

    match cli.command {
        Commands::Summary { range, output } => {
            let range = resolve_range(&dataset, &range)?;
            let filtered = dataset.filter_by_years(range);
            warn_if_empty(filtered.is_empty(), range);

            let counts = yearly::yearly_counts(&filtered);
            let top = yearly::top_years(&counts, 3);
            let casualties = yearly::yearly_casualties(&filtered);

            for t in &top {
                info!(year = t.year, accidents = t.accidents, "Top year");
            }

            if let Some(path) = output {
                export_csv(&path, &casualties)?;
                info!(path = %path, rows = casualties.len(), "Casualty rows written");
            }

            println!("{}", to_json(&casualties)?);
        }
        Commands::Kpi { range, output } => {
            let range = resolve_range(&dataset, &range)?;
            let filtered = dataset.filter_by_years(range);
            warn_if_empty(filtered.is_empty(), range);

            let series = kpi::kpi_series(&yearly::yearly_casualties(&filtered));

            info!(
                avg_fatalities_mean =
                    kpi::series_mean(series.iter().map(|s| s.avg_fatalities_per_accident)),
                survival_mean = kpi::series_mean(series.iter().map(|s| s.survival_index)),
                mortality_mean = kpi::series_mean(series.iter().map(|s| s.mortality_rate)),
                "KPI series computed"
            );

            if let Some(path) = output {
                export_csv(&path, &series)?;
                info!(path = %path, rows = series.len(), "KPI rows written");
            }

            println!("{}", to_json(&series)?);
        }
        Commands::Months {
            range,
            dimension,
            calendar,
        } => {
            let range = resolve_range(&dataset, &range)?;
            let filtered = dataset.filter_by_years(range);

            let order = if calendar {
                RowOrder::Calendar
            } else {
                RowOrder::TotalAscending
            };
            let tab = match dimension {
                Dimension::Aircraft => monthly::month_by_category(
                    &filtered,
                    |r| r.aircraft_class.as_str(),
                    &monthly::AIRCRAFT_CLASSES,
                    order,
                ),
                Dimension::Continent => monthly::month_by_category(
                    &filtered,
                    |r| r.continent.as_str(),
                    &monthly::CONTINENTS,
                    order,
                ),
            };

            warn_if_empty(tab.is_empty(), range);
            println!("{}", to_json(&tab)?);
        }
        Commands::Map => {
            let points = map::country_frequency_map(&dataset);
            info!(countries = points.len(), "Map points computed");
            println!("{}", to_json(&points)?);
        }
        Commands::Report { range } => {
            let range = resolve_range(&dataset, &range)?;
            let report = build_report(&dataset, range);
            warn_if_empty(report.yearly.is_empty(), range);
            println!("{}", to_json(&report)?);
        }
    }

    Ok(())
}

/// Fills missing bounds from the dataset and validates the range.
fn resolve_range(dataset: &Dataset, args: &RangeArgs) -> Result<YearRange> {
    let Some((lo, hi)) = dataset.year_bounds() else {
        bail!("dataset contains no usable records");
    };
    YearRange::new(args.min_year.unwrap_or(lo), args.max_year.unwrap_or(hi))
}

/// The empty selection is not an error; it is surfaced once so the consumer
/// renders "no data" instead of an empty chart.
fn warn_if_empty(is_empty: bool, range: YearRange) {
    if is_empty {
        warn!(
            min_year = range.min(),
            max_year = range.max(),
            "No data for the selected year range"
        );
    }
}
