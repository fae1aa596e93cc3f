//! Plain-text rendering of the dashboard sections.
//!
//! One section per view of the original dashboard, written to any
//! `io::Write` sink so tests can render into a buffer. All top-N
//! ordering happens here: the grouped tables arrive unsorted (or
//! pre-sorted, in the category case) per the pipeline's contract.

use std::io::{self, Write};

use dashboard_core::formatting::{format_currency, format_number};
use dashboard_core::models::{Metric, YearFilter};
use dashboard_data::aggregator::{rfm_averages, CategoryVolumeRow, CustomerCountRow, RfmRow};
use dashboard_data::analysis::AnalysisResult;
use dashboard_data::selector::filter_monthly;

/// Display knobs resolved from the CLI settings.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub metric: Metric,
    pub year: YearFilter,
    pub top_locations: usize,
    pub top_categories: usize,
    pub top_customers: usize,
}

/// Render the complete report.
pub fn render_report<W: Write>(
    out: &mut W,
    analysis: &AnalysisResult,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(out, "Public E-Commerce Dashboard")?;
    writeln!(out, "===========================")?;

    render_yearly(out, analysis)?;
    render_monthly_trend(out, analysis, options)?;
    render_customer_segments(out, analysis, options)?;
    render_categories(out, &analysis.tables.category_volume, options)?;
    render_rfm(out, &analysis.tables.rfm, options)?;

    Ok(())
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_yearly<W: Write>(out: &mut W, analysis: &AnalysisResult) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Yearly Performance Summary")?;
    writeln!(out, "--------------------------")?;
    writeln!(
        out,
        "Total Orders:  {}",
        format_number(analysis.distinct_orders as f64, 0)
    )?;
    writeln!(out, "Total Revenue: {}", format_currency(analysis.total_revenue))?;
    writeln!(out)?;

    for row in &analysis.tables.yearly {
        writeln!(
            out,
            "  {}  {:>10}  {:>18}",
            row.year,
            format_number(row.order_count as f64, 0),
            format_currency(row.revenue)
        )?;
    }
    Ok(())
}

fn render_monthly_trend<W: Write>(
    out: &mut W,
    analysis: &AnalysisResult,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Monthly {} Trend ({})",
        options.metric.label(),
        options.year
    )?;
    writeln!(out, "---------------------------------")?;

    let points = filter_monthly(&analysis.tables.monthly, options.metric, options.year);
    if points.is_empty() {
        writeln!(out, "  (no matching months)")?;
        return Ok(());
    }

    for point in points {
        writeln!(
            out,
            "  {}  {:>18}",
            point.month,
            format_metric_value(point.value, options.metric)
        )?;
    }
    Ok(())
}

fn render_customer_segments<W: Write>(
    out: &mut W,
    analysis: &AnalysisResult,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Customer Segmentation")?;
    writeln!(out, "---------------------")?;

    writeln!(
        out,
        "Top {} States by Number of Customers",
        options.top_locations
    )?;
    for row in top_by_count(&analysis.tables.by_state, options.top_locations) {
        writeln!(
            out,
            "  {:<24}  {:>10}",
            row.label,
            format_number(row.customer_count as f64, 0)
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Top {} Cities by Number of Customers",
        options.top_locations
    )?;
    for row in top_by_count(&analysis.tables.by_city, options.top_locations) {
        writeln!(
            out,
            "  {:<24}  {:>10}",
            row.label,
            format_number(row.customer_count as f64, 0)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Payment Methods Distribution")?;
    for row in &analysis.tables.payment_share {
        writeln!(out, "  {:<24}  {:>6.1}%", row.payment_type, row.share_pct)?;
    }
    Ok(())
}

fn render_categories<W: Write>(
    out: &mut W,
    categories: &[CategoryVolumeRow],
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Best & Worst Performing Product Categories")?;
    writeln!(out, "------------------------------------------")?;

    // The table arrives pre-sorted descending by volume.
    writeln!(out, "Best Performing Product Categories")?;
    for row in categories.iter().take(options.top_categories) {
        writeln!(
            out,
            "  {:<32}  {:>10}",
            row.category,
            format_number(row.items_ordered as f64, 0)
        )?;
    }

    // Bottom-N needs the ascending re-sort.
    writeln!(out)?;
    writeln!(out, "Worst Performing Product Categories")?;
    let mut ascending: Vec<&CategoryVolumeRow> = categories.iter().collect();
    ascending.sort_by(|a, b| a.items_ordered.cmp(&b.items_ordered));
    for row in ascending.iter().take(options.top_categories) {
        writeln!(
            out,
            "  {:<32}  {:>10}",
            row.category,
            format_number(row.items_ordered as f64, 0)
        )?;
    }
    Ok(())
}

fn render_rfm<W: Write>(out: &mut W, rfm: &[RfmRow], options: &ReportOptions) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "RFM Analysis")?;
    writeln!(out, "------------")?;

    match rfm_averages(rfm) {
        Some(averages) => {
            writeln!(
                out,
                "Average Recency (days): {}",
                format_number(averages.recency_days, 1)
            )?;
            writeln!(
                out,
                "Average Frequency:      {}",
                format_number(averages.frequency, 2)
            )?;
            writeln!(
                out,
                "Average Monetary:       {}",
                format_currency(averages.monetary)
            )?;
        }
        None => {
            writeln!(out, "No customer data.")?;
            return Ok(());
        }
    }

    writeln!(out)?;
    writeln!(out, "Top {} Customers by Recency (days)", options.top_customers)?;
    let mut by_recency: Vec<&RfmRow> = rfm.iter().collect();
    by_recency.sort_by(|a, b| a.recency_days.cmp(&b.recency_days));
    for row in by_recency.iter().take(options.top_customers) {
        writeln!(
            out,
            "  {:<10}  {:>10}",
            row.customer_label,
            format_number(row.recency_days as f64, 0)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Top {} Customers by Frequency", options.top_customers)?;
    let mut by_frequency: Vec<&RfmRow> = rfm.iter().collect();
    by_frequency.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    for row in by_frequency.iter().take(options.top_customers) {
        writeln!(
            out,
            "  {:<10}  {:>10}",
            row.customer_label,
            format_number(row.frequency as f64, 0)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Top {} Customers by Monetary", options.top_customers)?;
    let mut by_monetary: Vec<&RfmRow> = rfm.iter().collect();
    by_monetary.sort_by(|a, b| {
        b.monetary
            .partial_cmp(&a.monetary)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for row in by_monetary.iter().take(options.top_customers) {
        writeln!(
            out,
            "  {:<10}  {:>18}",
            row.customer_label,
            format_currency(row.monetary)
        )?;
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Descending-by-count view of a distinct-customer table, truncated to
/// `n`. The sort is stable, so count ties keep the table's ascending
/// label order.
fn top_by_count(rows: &[CustomerCountRow], n: usize) -> Vec<&CustomerCountRow> {
    let mut sorted: Vec<&CustomerCountRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.customer_count.cmp(&a.customer_count));
    sorted.truncate(n);
    sorted
}

fn format_metric_value(value: f64, metric: Metric) -> String {
    match metric {
        Metric::OrderCount => format_number(value, 0),
        Metric::Revenue => format_currency(value),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
