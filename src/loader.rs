//! CSV loading for the accident dataset.
//!
//! The dataset is loaded once at startup into an immutable [`Dataset`]; the
//! year and month columns are derived at load time and every view is computed
//! from scratch against that table on each invocation.

use anyhow::{Context, Result, ensure};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns the pipeline cannot run without. Checked at load; a missing
/// column halts startup rather than producing silently empty views.
const REQUIRED_COLUMNS: &[&str] = &[
    "fecha",
    "all_aboard",
    "cantidad de fallecidos",
    "ac_type_clasif2",
    "Ruta_continente",
    "Ruta_pais",
    "Ruta_lat",
    "Ruta_lon",
];

/// One raw row of `accidentes_data.csv`, column names as shipped.
///
/// Counts arrive as floats because the source table carries blanks that
/// pandas rendered as NaN; they are clamped to non-negative integers.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "fecha")]
    date: String,
    #[serde(rename = "all_aboard")]
    all_aboard: Option<f64>,
    #[serde(rename = "cantidad de fallecidos")]
    fatalities: Option<f64>,
    #[serde(rename = "ac_type_clasif2")]
    aircraft_class: Option<String>,
    #[serde(rename = "Ruta_continente")]
    continent: Option<String>,
    #[serde(rename = "Ruta_pais")]
    country: Option<String>,
    #[serde(rename = "Ruta_lat")]
    latitude: Option<f64>,
    #[serde(rename = "Ruta_lon")]
    longitude: Option<f64>,
}

/// A single accident with its derived time fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    pub date: NaiveDate,
    /// Derived from `date` at load time.
    pub year: i32,
    /// Derived from `date` at load time, 1-based calendar month.
    pub month: u32,
    /// People aboard the aircraft (occupancy). Missing in source -> 0.
    pub all_aboard: u64,
    /// Deaths. Missing in source -> 0. Not validated against `all_aboard`.
    pub fatalities: u64,
    pub aircraft_class: String,
    pub continent: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AccidentRecord {
    /// Both coordinates present.
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// An inclusive year interval used to bound the time-based views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// # Errors
    ///
    /// Returns an error if `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self> {
        ensure!(min <= max, "invalid year range: {} > {}", min, max);
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// The loaded accident table. Immutable after load; views borrow from it.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<AccidentRecord>,
    skipped_dates: usize,
}

impl Dataset {
    /// Loads the dataset from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a required column is
    /// absent. Rows whose date cannot be parsed are skipped, not fatal.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open dataset {}", path.display()))?;
        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            skipped = dataset.skipped_dates,
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Loads the dataset from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);

        // serde quietly maps absent Option columns to None, so column
        // presence has to be checked against the header row up front.
        let headers = rdr.headers().context("dataset has no header row")?;
        for column in REQUIRED_COLUMNS {
            ensure!(
                headers.iter().any(|h| h == *column),
                "dataset is missing required column {:?}",
                column
            );
        }

        let mut records = Vec::new();
        let mut skipped_dates = 0usize;

        for (idx, result) in rdr.deserialize().enumerate() {
            let raw: RawRow = result.with_context(|| format!("bad record at row {}", idx + 1))?;

            let Some(date) = parse_date(&raw.date) else {
                warn!(row = idx + 1, date = %raw.date, "Unparseable date, row skipped");
                skipped_dates += 1;
                continue;
            };

            records.push(AccidentRecord {
                date,
                year: date.year(),
                month: date.month(),
                all_aboard: count_field(raw.all_aboard),
                fatalities: count_field(raw.fatalities),
                aircraft_class: raw.aircraft_class.unwrap_or_default(),
                continent: raw.continent.unwrap_or_default(),
                country: raw.country.unwrap_or_default(),
                latitude: raw.latitude,
                longitude: raw.longitude,
            });
        }

        debug!(records = records.len(), skipped_dates, "CSV parse complete");
        Ok(Self {
            records,
            skipped_dates,
        })
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped at load time because their date would not parse.
    pub fn skipped_dates(&self) -> usize {
        self.skipped_dates
    }

    /// Smallest and largest year observed in the table.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().map(|r| r.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    /// Selects the rows whose year falls inside `range`, preserving order.
    ///
    /// An empty selection is not an error; consumers render "no data".
    pub fn filter_by_years(&self, range: YearRange) -> FilteredTable<'_> {
        FilteredTable {
            rows: self
                .records
                .iter()
                .filter(|r| range.contains(r.year))
                .collect(),
        }
    }
}

/// A borrowed, order-preserving selection of the dataset.
#[derive(Debug)]
pub struct FilteredTable<'a> {
    rows: Vec<&'a AccidentRecord>,
}

impl<'a> FilteredTable<'a> {
    pub fn rows(&self) -> &[&'a AccidentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-filtering with the same range is a no-op.
    pub fn filter_by_years(&self, range: YearRange) -> FilteredTable<'a> {
        FilteredTable {
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|r| range.contains(r.year))
                .collect(),
        }
    }
}

/// Parses the formats observed in the source table. The export uses ISO
/// dates; older cuts carried US-style slashes.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

fn count_field(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
fecha,all_aboard,cantidad de fallecidos,ac_type_clasif2,Ruta_continente,Ruta_pais,Ruta_lat,Ruta_lon
2000-05-01,100,20,Avión,Americas,Argentina,-34.6,-58.4
2001-07-15,50,50,Helicóptero,Europe,France,48.8,2.3
not-a-date,10,1,Avión,Asia,Japan,35.6,139.7
2001-12-30,,,Dirigible,Oceania,Australia,,
";

    fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_skips_bad_dates() {
        let ds = dataset();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.skipped_dates(), 1);
    }

    #[test]
    fn test_derived_year_and_month() {
        let ds = dataset();
        let first = &ds.records()[0];
        assert_eq!(first.year, 2000);
        assert_eq!(first.month, 5);
    }

    #[test]
    fn test_missing_counts_become_zero() {
        let ds = dataset();
        let last = &ds.records()[2];
        assert_eq!(last.all_aboard, 0);
        assert_eq!(last.fatalities, 0);
        assert_eq!(last.coordinate(), None);
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(dataset().year_bounds(), Some((2000, 2001)));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let csv = "fecha,all_aboard\n2000-01-01,10\n";
        assert!(Dataset::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_year_range_rejects_inverted() {
        assert!(YearRange::new(2005, 2000).is_err());
        assert!(YearRange::new(2000, 2000).is_ok());
    }

    #[test]
    fn test_filter_by_years_inclusive_and_ordered() {
        let ds = dataset();
        let range = YearRange::new(2001, 2001).unwrap();
        let filtered = ds.filter_by_years(range);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.rows().iter().all(|r| r.year == 2001));
        // Row order preserved from the source table.
        assert!(filtered.rows()[0].date < filtered.rows()[1].date);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = dataset();
        let range = YearRange::new(2000, 2001).unwrap();
        let once = ds.filter_by_years(range);
        let twice = once.filter_by_years(range);
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn test_filter_empty_range_is_not_an_error() {
        let ds = dataset();
        let range = YearRange::new(1950, 1960).unwrap();
        assert!(ds.filter_by_years(range).is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("1972-06-14").is_some());
        assert!(parse_date("06/14/1972").is_some());
        assert!(parse_date("").is_none());
        assert!(parse_date("June 1972").is_none());
    }
}
