//! Month x category cross tabulations for the stacked bar charts.

use crate::loader::{AccidentRecord, FilteredTable};
use crate::pipeline::types::{MonthCrossTab, MonthRow, RowOrder};

/// Three-letter uppercase month codes, calendar order.
pub const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Aircraft classes shown in the month x aircraft chart, as they appear in
/// the dataset. Records outside this list are dropped from that view only.
pub const AIRCRAFT_CLASSES: [&str; 5] = [
    "Avión",
    "Helicóptero",
    "Dirigible",
    "Hidroavión",
    "Globo aerostático",
];

/// Continents shown in the month x continent chart.
pub const CONTINENTS: [&str; 5] = ["Americas", "Europe", "Asia", "Africa", "Oceania"];

/// Cross-tabulates accidents by calendar month and an allow-listed category.
///
/// Always returns 12 month rows with one zero-filled column per allowed
/// category; records whose category is not in `allowed` are excluded from
/// this view only. An all-zero table is returned as-is, the "no data" case
/// is detected by the consumer via [`MonthCrossTab::is_empty`].
pub fn month_by_category<F>(
    table: &FilteredTable,
    category: F,
    allowed: &[&str],
    order: RowOrder,
) -> MonthCrossTab
where
    F: Fn(&AccidentRecord) -> &str,
{
    let mut cells = vec![vec![0u64; allowed.len()]; 12];

    for record in table.rows() {
        let Some(col) = allowed.iter().position(|c| *c == category(record)) else {
            continue;
        };
        cells[record.month as usize - 1][col] += 1;
    }

    let mut rows: Vec<MonthRow> = MONTH_LABELS
        .into_iter()
        .zip(cells)
        .map(|(month, counts)| MonthRow { month, counts })
        .collect();

    if order == RowOrder::TotalAscending {
        // Stable sort, so tied totals keep calendar order.
        rows.sort_by_key(MonthRow::total);
    }

    MonthCrossTab {
        categories: allowed.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

/// The month x aircraft view with the dashboard's default ordering.
pub fn month_by_aircraft(table: &FilteredTable) -> MonthCrossTab {
    month_by_category(
        table,
        |r| r.aircraft_class.as_str(),
        &AIRCRAFT_CLASSES,
        RowOrder::TotalAscending,
    )
}

/// The month x continent view with the dashboard's default ordering.
pub fn month_by_continent(table: &FilteredTable) -> MonthCrossTab {
    month_by_category(
        table,
        |r| r.continent.as_str(),
        &CONTINENTS,
        RowOrder::TotalAscending,
    )
}
