//! The metric/year selector layer over the monthly summary.
//!
//! This is the only computation that re-runs per user interaction; it
//! never mutates the monthly table, it allocates a fresh narrowed view.

use std::collections::BTreeMap;

use dashboard_core::models::{Metric, YearFilter};
use dashboard_core::time_utils::{month_number, MONTH_ABBREVS};
use serde::Serialize;

use crate::aggregator::MonthlySummaryRow;

/// One point of the monthly trend view: month label → metric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// Abbreviated month label, e.g. `"Jan"`.
    pub month: String,
    /// Value of the selected metric (order counts are whole numbers
    /// carried as `f64` so both metrics share one column).
    pub value: f64,
}

/// Narrow the monthly summary to the selected metric and year.
///
/// With a specific year, this is the matching subset of rows (already
/// chronological); a year with no rows yields an empty view. With
/// [`YearFilter::All`], the selected metric is summed per month label
/// across all years — only the numeric metric column is aggregated —
/// and the output is ordered Jan..Dec by calendar month, never
/// lexically.
pub fn filter_monthly(
    monthly: &[MonthlySummaryRow],
    metric: Metric,
    year: YearFilter,
) -> Vec<MonthlyPoint> {
    match year {
        YearFilter::Year(y) => monthly
            .iter()
            .filter(|row| row.year == y)
            .map(|row| MonthlyPoint {
                month: row.month.clone(),
                value: metric_value(row, metric),
            })
            .collect(),

        YearFilter::All => {
            // Keyed by month number so iteration is chronological.
            let mut sums: BTreeMap<u32, f64> = BTreeMap::new();
            for row in monthly {
                if let Some(n) = month_number(&row.month) {
                    *sums.entry(n).or_default() += metric_value(row, metric);
                }
            }
            sums.into_iter()
                .map(|(n, value)| MonthlyPoint {
                    month: MONTH_ABBREVS[n as usize - 1].to_string(),
                    value,
                })
                .collect()
        }
    }
}

fn metric_value(row: &MonthlySummaryRow, metric: Metric) -> f64 {
    match metric {
        Metric::OrderCount => row.order_count as f64,
        Metric::Revenue => row.revenue,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
