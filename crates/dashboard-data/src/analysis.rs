//! Top-level analysis pipeline for the commerce dashboard.
//!
//! Loads the base dataset once and derives every summary table from it,
//! returning an [`AnalysisResult`] ready for the presentation layer.
//! The derived tables are computed eagerly here and then only read —
//! the one per-interaction computation (the metric/year selector) runs
//! against `tables.monthly` via [`crate::selector::filter_monthly`].

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use dashboard_core::error::Result;
use dashboard_core::models::OrderRecord;
use tracing::{debug, info};

use crate::aggregator::{
    category_order_volume, customers_by_city, customers_by_payment_type, customers_by_state,
    monthly_summary, payment_type_share, rfm_table, yearly_summary, CategoryVolumeRow,
    CustomerCountRow, MonthlySummaryRow, PaymentShareRow, RfmRow, YearlySummaryRow,
};
use crate::reader::load_orders;

// ── Public types ──────────────────────────────────────────────────────────────

/// Every derived table, computed once per dataset load.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardTables {
    pub yearly: Vec<YearlySummaryRow>,
    pub monthly: Vec<MonthlySummaryRow>,
    pub by_state: Vec<CustomerCountRow>,
    pub by_city: Vec<CustomerCountRow>,
    pub by_payment: Vec<CustomerCountRow>,
    pub category_volume: Vec<CategoryVolumeRow>,
    pub payment_share: Vec<PaymentShareRow>,
    pub rfm: Vec<RfmRow>,
}

impl DashboardTables {
    /// Derive all tables from the loaded dataset.
    ///
    /// Each table is computed independently from the same base rows; no
    /// table feeds into another.
    pub fn build(records: &[OrderRecord]) -> Self {
        Self {
            yearly: yearly_summary(records),
            monthly: monthly_summary(records),
            by_state: customers_by_state(records),
            by_city: customers_by_city(records),
            by_payment: customers_by_payment_type(records),
            category_volume: category_order_volume(records),
            payment_share: payment_type_share(records),
            rfm: rfm_table(records),
        }
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of order lines loaded.
    pub rows_loaded: usize,
    /// Wall-clock seconds spent loading the CSV.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent deriving the tables.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze_orders`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// The derived tables.
    pub tables: DashboardTables,
    /// Metadata about this analysis run.
    pub metadata: AnalysisMetadata,
    /// Number of order lines in the base dataset.
    pub record_count: usize,
    /// Count of distinct order ids across the whole dataset.
    pub distinct_orders: u64,
    /// Summed item price across the whole dataset.
    pub total_revenue: f64,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline against the dataset at `data_file`.
///
/// 1. Load and chronologically order the base dataset.
/// 2. Derive the summary tables via [`DashboardTables::build`].
/// 3. Compute dataset-wide totals.
pub fn analyze_orders(data_file: &Path) -> Result<AnalysisResult> {
    // ── Step 1: Load the base dataset ─────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let records = load_orders(data_file)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Derive the tables ─────────────────────────────────────────────
    let aggregate_start = std::time::Instant::now();
    let tables = DashboardTables::build(&records);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    // ── Step 3: Dataset-wide totals ───────────────────────────────────────────
    let distinct_orders = records
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;
    let total_revenue: f64 = records.iter().map(|r| r.price).sum();

    debug!(
        "Derived {} yearly, {} monthly, {} RFM rows",
        tables.yearly.len(),
        tables.monthly.len(),
        tables.rfm.len()
    );
    info!(
        "Analysed {} order lines ({} distinct orders) in {:.3}s",
        records.len(),
        distinct_orders,
        load_time + aggregate_time
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        rows_loaded: records.len(),
        load_time_seconds: load_time,
        aggregate_time_seconds: aggregate_time,
    };

    Ok(AnalysisResult {
        record_count: records.len(),
        distinct_orders,
        total_revenue,
        tables,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
