//! CSV dataset loading for the commerce dashboard.
//!
//! Reads the pre-joined order-line export into [`OrderRecord`] structs,
//! coercing the six timestamp columns and establishing the chronological
//! base order every aggregation relies on. Unlike a log reader, this
//! loader never skips a bad row: the aggregations are only meaningful
//! over a fully valid dataset, so any malformed cell fails the load.

use std::path::Path;

use chrono::NaiveDateTime;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::OrderRecord;
use serde::Deserialize;
use tracing::debug;

/// Columns that must be present in the dataset header.
const REQUIRED_COLUMNS: &[&str] = &[
    "order_id",
    "customer_id",
    "customer_city",
    "customer_state",
    "product_category_name_english",
    "order_item_id",
    "price",
    "payment_type",
    "order_purchase_timestamp",
    "order_approved_at",
    "order_delivered_carrier_date",
    "order_delivered_customer_date",
    "order_estimated_delivery_date",
    "shipping_limit_date",
];

/// Timestamp formats the source export is known to produce.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Row shape as it comes off the CSV, before type coercion.
///
/// Everything is kept as text here so parse failures can be reported
/// with the exact row, column and offending value.
#[derive(Debug, Deserialize)]
struct RawOrderRow {
    order_id: String,
    customer_id: String,
    customer_city: String,
    customer_state: String,
    product_category_name_english: String,
    order_item_id: String,
    price: String,
    payment_type: String,
    order_purchase_timestamp: String,
    order_approved_at: String,
    order_delivered_carrier_date: String,
    order_delivered_customer_date: String,
    order_estimated_delivery_date: String,
    shipping_limit_date: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the order dataset from `path`.
///
/// Returns the rows sorted ascending by purchase timestamp (stable, so
/// rows with equal timestamps keep their file order). Fails on a missing
/// file, a missing required column, or any cell that does not parse —
/// the dataset is either loaded whole or not at all.
pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    validate_header(reader.headers()?)?;

    let mut records: Vec<OrderRecord> = Vec::new();
    for (idx, row) in reader.deserialize::<RawOrderRow>().enumerate() {
        let raw = row?;
        records.push(parse_row(idx + 1, raw)?);
    }

    records.sort_by_key(|r| r.purchase_timestamp);

    debug!(
        "Loaded {} order lines from {}",
        records.len(),
        path.display()
    );

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Check that every required column is present before parsing any row.
fn validate_header(headers: &csv::StringRecord) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(DashboardError::MissingColumn((*column).to_string()));
        }
    }
    Ok(())
}

/// Coerce one raw row into a typed [`OrderRecord`].
///
/// `row` is the 1-based data-row number used in error messages.
fn parse_row(row: usize, raw: RawOrderRow) -> Result<OrderRecord> {
    let order_item_id = raw.order_item_id.trim().parse::<u32>().map_err(|_| {
        DashboardError::NumberParse {
            row,
            column: "order_item_id",
            value: raw.order_item_id.clone(),
        }
    })?;

    let price = raw
        .price
        .trim()
        .parse::<f64>()
        .map_err(|_| DashboardError::NumberParse {
            row,
            column: "price",
            value: raw.price.clone(),
        })?;

    Ok(OrderRecord {
        order_id: raw.order_id,
        customer_id: raw.customer_id,
        customer_city: raw.customer_city,
        customer_state: raw.customer_state,
        product_category: raw.product_category_name_english,
        order_item_id,
        price,
        payment_type: raw.payment_type,
        purchase_timestamp: parse_timestamp(
            row,
            "order_purchase_timestamp",
            &raw.order_purchase_timestamp,
        )?,
        approved_at: parse_optional_timestamp(row, "order_approved_at", &raw.order_approved_at)?,
        delivered_carrier_date: parse_optional_timestamp(
            row,
            "order_delivered_carrier_date",
            &raw.order_delivered_carrier_date,
        )?,
        delivered_customer_date: parse_optional_timestamp(
            row,
            "order_delivered_customer_date",
            &raw.order_delivered_customer_date,
        )?,
        estimated_delivery_date: parse_optional_timestamp(
            row,
            "order_estimated_delivery_date",
            &raw.order_estimated_delivery_date,
        )?,
        shipping_limit_date: parse_optional_timestamp(
            row,
            "shipping_limit_date",
            &raw.shipping_limit_date,
        )?,
    })
}

/// Parse a required timestamp cell.
fn parse_timestamp(row: usize, column: &'static str, value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(ts);
        }
    }
    Err(DashboardError::TimestampParse {
        row,
        column,
        value: value.to_string(),
    })
}

/// Parse a lifecycle timestamp cell.
///
/// The source export writes missing lifecycle dates as empty fields, so
/// empty → `None`; anything non-empty must parse.
fn parse_optional_timestamp(
    row: usize,
    column: &'static str,
    value: &str,
) -> Result<Option<NaiveDateTime>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(row, column, value).map(Some)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
