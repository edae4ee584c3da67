//! KPI series derived from the per-year casualty table.
//!
//! Four indicators per year: average fatalities per accident, survival
//! index, mortality rate, and the mortality-rate change against the
//! following year. Degenerate divisions propagate as non-finite values and
//! are filtered at render time, never here.

use crate::pipeline::types::{YearCasualties, YearSummary};

/// Target thresholds drawn on each KPI chart as a reference line.
pub const TARGET_AVG_FATALITIES: f64 = 30.0;
pub const TARGET_SURVIVAL_INDEX: f64 = 50.0;
pub const TARGET_MORTALITY_RATE: f64 = 65.0;
pub const TARGET_MORTALITY_DELTA: f64 = 5.0;

/// Builds the KPI series, ascending by year.
///
/// Expects `rows` ascending by year as produced by
/// [`crate::pipeline::yearly::yearly_casualties`]. A year with zero
/// occupancy yields NaN mortality and survival values; the delta of the
/// last year is NaN because it has no successor to compare against.
pub fn kpi_series(rows: &[YearCasualties]) -> Vec<YearSummary> {
    let rates: Vec<f64> = rows.iter().map(mortality_rate).collect();

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mortality_rate_delta = match rates.get(i + 1) {
                Some(next) => (rates[i] - next) / rates[i] * 100.0,
                None => f64::NAN,
            };

            YearSummary {
                year: row.year,
                accidents: row.accidents,
                occupancy: row.occupancy,
                fatalities: row.fatalities,
                mortality_rate: rates[i],
                mortality_rate_delta,
                survival_index: survival_index(row),
                avg_fatalities_per_accident: if row.accidents == 0 {
                    f64::NAN
                } else {
                    row.fatalities as f64 / row.accidents as f64
                },
            }
        })
        .collect()
}

fn mortality_rate(row: &YearCasualties) -> f64 {
    if row.occupancy == 0 {
        f64::NAN
    } else {
        row.fatalities as f64 / row.occupancy as f64 * 100.0
    }
}

fn survival_index(row: &YearCasualties) -> f64 {
    if row.occupancy == 0 {
        f64::NAN
    } else {
        // Casting first lets fatalities > occupancy pass through as a
        // negative index instead of underflowing; bad data is not repaired.
        (row.occupancy as f64 - row.fatalities as f64) / row.occupancy as f64 * 100.0
    }
}

/// Mean over the finite values of a KPI series, for the chart's average
/// annotation. Non-finite points are skipped, matching what the renderer
/// plots. Returns NaN when no finite value exists.
pub fn series_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, accidents: usize, occupancy: u64, fatalities: u64) -> YearCasualties {
        YearCasualties {
            year,
            accidents,
            occupancy,
            fatalities,
        }
    }

    #[test]
    fn test_worked_example() {
        let rows = vec![row(2000, 1, 100, 20), row(2001, 1, 50, 50)];
        let series = kpi_series(&rows);

        assert_eq!(series.len(), 2);

        let y2000 = &series[0];
        assert!((y2000.mortality_rate - 20.0).abs() < 1e-9);
        assert!((y2000.survival_index - 80.0).abs() < 1e-9);
        assert!((y2000.avg_fatalities_per_accident - 20.0).abs() < 1e-9);
        // (20 - 100) / 20 * 100
        assert!((y2000.mortality_rate_delta - -400.0).abs() < 1e-9);

        let y2001 = &series[1];
        assert!((y2001.mortality_rate - 100.0).abs() < 1e-9);
        assert!((y2001.survival_index - 0.0).abs() < 1e-9);
        assert!((y2001.avg_fatalities_per_accident - 50.0).abs() < 1e-9);
        assert!(y2001.mortality_rate_delta.is_nan());
    }

    #[test]
    fn test_survival_plus_mortality_is_hundred() {
        let rows = vec![row(1999, 3, 250, 97), row(2000, 2, 80, 11)];
        for s in kpi_series(&rows) {
            assert!((s.survival_index + s.mortality_rate - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_occupancy_propagates_nan() {
        let rows = vec![row(2000, 2, 0, 0), row(2001, 1, 10, 5)];
        let series = kpi_series(&rows);

        assert!(series[0].mortality_rate.is_nan());
        assert!(series[0].survival_index.is_nan());
        // NaN rate makes the forward delta NaN too, nothing panics.
        assert!(series[0].mortality_rate_delta.is_nan());
        assert!((series[1].mortality_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_year_delta_is_non_finite() {
        let rows = vec![row(2000, 1, 10, 1)];
        let series = kpi_series(&rows);
        assert!(!series[0].mortality_rate_delta.is_finite());
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(kpi_series(&[]).is_empty());
    }

    #[test]
    fn test_series_mean_skips_non_finite() {
        let mean = series_mean(vec![10.0, f64::NAN, 20.0]);
        assert!((mean - 15.0).abs() < 1e-9);
        assert!(series_mean(std::iter::empty()).is_nan());
        assert!(series_mean(vec![f64::NAN]).is_nan());
    }
}
