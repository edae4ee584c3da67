//! Output formatting for the pipeline's chart-ready tables.
//!
//! Supports pretty-printing, JSON serialization, CSV export, and assembling
//! the full dashboard payload.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::loader::{Dataset, YearRange};
use crate::pipeline::types::{CountryPoint, MonthCrossTab, YearCasualties, YearCount, YearSummary};
use crate::pipeline::{kpi, map, monthly, yearly};
use csv::WriterBuilder;
use std::path::Path;

/// Everything the dashboard renders, for one year-range selection.
#[derive(Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub min_year: i32,
    pub max_year: i32,
    pub yearly: Vec<YearCount>,
    pub top_years: Vec<YearCount>,
    pub casualties: Vec<YearCasualties>,
    pub months_by_aircraft: MonthCrossTab,
    pub months_by_continent: MonthCrossTab,
    pub kpis: Vec<YearSummary>,
    /// Always computed over the full dataset; the map ignores the selector.
    pub map: Vec<CountryPoint>,
}

/// Runs every view of the pipeline for one selection.
pub fn build_report(dataset: &Dataset, range: YearRange) -> DashboardReport {
    let filtered = dataset.filter_by_years(range);
    debug!(rows = filtered.len(), "Building dashboard report");

    let counts = yearly::yearly_counts(&filtered);
    let top = yearly::top_years(&counts, 3);
    let casualties = yearly::yearly_casualties(&filtered);
    let kpis = kpi::kpi_series(&casualties);

    DashboardReport {
        generated_at: Utc::now(),
        min_year: range.min(),
        max_year: range.max(),
        yearly: counts,
        top_years: top,
        casualties,
        months_by_aircraft: monthly::month_by_aircraft(&filtered),
        months_by_continent: monthly::month_by_continent(&filtered),
        kpis,
        map: map::country_frequency_map(dataset),
    }
}

/// Logs a table using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Serializes a table as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes serializable rows to a CSV file, headers first, replacing any
/// existing file.
pub fn export_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV export");

    let mut writer = WriterBuilder::new().from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
