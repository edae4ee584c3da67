//! Output row types produced by the aggregation pipeline.
//!
//! Every type here is a plain serializable row ready for direct binding to a
//! line/area/bar/map widget.

use serde::Serialize;

/// One point of the accidents-per-year line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub accidents: usize,
}

/// Per-year accident count with both casualty sums.
///
/// `occupancy` sums `all_aboard`; `fatalities` sums the deaths column. The
/// source dashboard plotted `occupancy` under a "deaths" label in one chart;
/// the two quantities are deliberately kept apart here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCasualties {
    pub year: i32,
    pub accidents: usize,
    pub occupancy: u64,
    pub fatalities: u64,
}

/// One year of the KPI series.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub accidents: usize,
    pub occupancy: u64,
    pub fatalities: u64,
    /// Percentage of occupants who died. NaN when occupancy is zero.
    pub mortality_rate: f64,
    /// Change of the mortality rate against the *following* year:
    /// `(rate[y] - rate[y+1]) / rate[y] * 100`. The source dashboard used
    /// `diff(-1)`, so the comparison runs forward, not against the prior
    /// year. NaN for the last year in range, which has no successor.
    pub mortality_rate_delta: f64,
    /// Percentage of occupants who survived. NaN when occupancy is zero.
    pub survival_index: f64,
    pub avg_fatalities_per_accident: f64,
}

/// Row ordering policy for [`MonthCrossTab`].
///
/// The source dashboard sorted month rows by their total, an incidental
/// side effect of the pivot; it is kept as an explicit, named policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// January through December.
    Calendar,
    /// Smallest row total first; ties keep calendar order.
    TotalAscending,
}

/// One month row of a cross tabulation: one count per category column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRow {
    /// Three-letter uppercase month code, JAN..DEC.
    pub month: &'static str,
    pub counts: Vec<u64>,
}

impl MonthRow {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Month x category cross tabulation, always 12 rows, zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCrossTab {
    /// Category column names, in allow-list order.
    pub categories: Vec<String>,
    pub rows: Vec<MonthRow>,
}

impl MonthCrossTab {
    /// True when every cell is zero. The table itself is still returned
    /// zero-filled; rendering a "no data" message is the consumer's call.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.counts.iter().all(|&c| c == 0))
    }

    /// Cell lookup by month code and category name, for consumers that
    /// address cells rather than iterate rows.
    pub fn get(&self, month: &str, category: &str) -> Option<u64> {
        let col = self.categories.iter().position(|c| c == category)?;
        let row = self.rows.iter().find(|r| r.month == month)?;
        row.counts.get(col).copied()
    }
}

/// One map marker: a country with its first-seen coordinate and its
/// accident count over the full, unfiltered dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPoint {
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accidents: u64,
}
