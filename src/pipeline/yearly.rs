//! Per-year aggregations: accident counts, annotation years, casualty sums.

use std::collections::BTreeMap;

use crate::loader::FilteredTable;
use crate::pipeline::types::{YearCasualties, YearCount};

/// Counts accidents per year, ascending by year.
pub fn yearly_counts(table: &FilteredTable) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for record in table.rows() {
        *counts.entry(record.year).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(year, accidents)| YearCount { year, accidents })
        .collect()
}

/// Picks the `n` years with the most accidents for chart annotation.
///
/// Ties go to the earlier year; expects `counts` ascending by year as
/// produced by [`yearly_counts`]. Returns fewer than `n` entries when fewer
/// distinct years exist. Output is ordered by count, highest first.
pub fn top_years(counts: &[YearCount], n: usize) -> Vec<YearCount> {
    let mut ranked = counts.to_vec();
    // Stable sort keeps ascending-year order among equal counts.
    ranked.sort_by(|a, b| b.accidents.cmp(&a.accidents));
    ranked.truncate(n);
    ranked
}

/// Per-year accident counts with both casualty sums, ascending by year.
pub fn yearly_casualties(table: &FilteredTable) -> Vec<YearCasualties> {
    let mut sums: BTreeMap<i32, (usize, u64, u64)> = BTreeMap::new();
    for record in table.rows() {
        let entry = sums.entry(record.year).or_default();
        entry.0 += 1;
        entry.1 += record.all_aboard;
        entry.2 += record.fatalities;
    }

    sums.into_iter()
        .map(|(year, (accidents, occupancy, fatalities))| YearCasualties {
            year,
            accidents,
            occupancy,
            fatalities,
        })
        .collect()
}
