//! The seven derived tables behind the dashboard views.
//!
//! Every function here is pure: it takes the loaded dataset by
//! reference and allocates a fresh output table, so recomputing any
//! table from an unmodified dataset yields identical rows. Grouping is
//! done through `BTreeMap` keys, which fixes the group-iteration order
//! (ascending key) — the RFM table's positional labels depend on that
//! contract.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use dashboard_core::models::{normalize_category_name, OrderRecord};
use dashboard_core::time_utils::{year_label, MONTH_ABBREVS};
use serde::Serialize;

// ── Row types ─────────────────────────────────────────────────────────────────

/// One calendar year of order activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySummaryRow {
    /// 4-digit year label.
    pub year: String,
    /// Count of distinct order ids placed in the year.
    pub order_count: u64,
    /// Summed item price over all line items in the year.
    pub revenue: f64,
}

/// One calendar month of order activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummaryRow {
    /// Period key, e.g. `"2018-01"`.
    pub period: String,
    /// Calendar year, kept as its own field for the year selector.
    pub year: i32,
    /// Abbreviated month label, e.g. `"Jan"` — the cross-year grouping key.
    pub month: String,
    /// Count of distinct order ids placed in the month.
    pub order_count: u64,
    /// Summed item price over all line items in the month.
    pub revenue: f64,
}

/// Distinct-customer count for one categorical group (state, city or
/// payment type).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerCountRow {
    /// The group value, as it appears in the data.
    pub label: String,
    /// Count of distinct customer ids in the group.
    pub customer_count: u64,
}

/// Order-item volume for one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryVolumeRow {
    /// Display-normalized category name.
    pub category: String,
    /// Summed line-item sequence numbers for the category.
    pub items_ordered: u64,
}

/// Recency/frequency/monetary figures for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmRow {
    pub customer_id: String,
    /// Count of distinct order ids.
    pub frequency: u64,
    /// Summed item price.
    pub monetary: f64,
    /// Whole days between the customer's last purchase date and the
    /// dataset-wide latest purchase date. Never negative.
    pub recency_days: i64,
    /// Positional `USER_{n:03}` label, assigned 1-based over ascending
    /// customer id. Display-only — not a meaningful identifier.
    pub customer_label: String,
}

/// Mean RFM figures across all customers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmAverages {
    pub recency_days: f64,
    pub frequency: f64,
    pub monetary: f64,
}

/// Share of order lines per payment type, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShareRow {
    /// Display-normalized payment type name.
    pub payment_type: String,
    /// Percentage of all order lines paid this way.
    pub share_pct: f64,
}

// ── Accumulators ──────────────────────────────────────────────────────────────

/// Distinct orders plus summed revenue within one group.
#[derive(Default)]
struct OrderAccumulator<'a> {
    orders: HashSet<&'a str>,
    revenue: f64,
}

impl<'a> OrderAccumulator<'a> {
    fn add(&mut self, record: &'a OrderRecord) {
        self.orders.insert(record.order_id.as_str());
        self.revenue += record.price;
    }
}

/// Per-customer accumulator for the RFM table.
struct RfmAccumulator<'a> {
    last_purchase: NaiveDate,
    orders: HashSet<&'a str>,
    monetary: f64,
}

impl<'a> RfmAccumulator<'a> {
    fn new(record: &'a OrderRecord) -> Self {
        let mut acc = Self {
            last_purchase: record.purchase_date(),
            orders: HashSet::new(),
            monetary: 0.0,
        };
        acc.add(record);
        acc
    }

    fn add(&mut self, record: &'a OrderRecord) {
        self.last_purchase = self.last_purchase.max(record.purchase_date());
        self.orders.insert(record.order_id.as_str());
        self.monetary += record.price;
    }
}

// ── Time-bucketed summaries ───────────────────────────────────────────────────

/// Group by calendar year of purchase; count distinct orders and sum
/// revenue. Rows come out chronologically.
pub fn yearly_summary(records: &[OrderRecord]) -> Vec<YearlySummaryRow> {
    let mut map: BTreeMap<i32, OrderAccumulator<'_>> = BTreeMap::new();

    for record in records {
        map.entry(record.purchase_timestamp.year())
            .or_default()
            .add(record);
    }

    map.into_iter()
        .map(|(year, acc)| YearlySummaryRow {
            year: year_label(year),
            order_count: acc.orders.len() as u64,
            revenue: acc.revenue,
        })
        .collect()
}

/// Group by calendar month (year + month) of purchase; count distinct
/// orders and sum revenue. Rows come out chronologically.
pub fn monthly_summary(records: &[OrderRecord]) -> Vec<MonthlySummaryRow> {
    let mut map: BTreeMap<(i32, u32), OrderAccumulator<'_>> = BTreeMap::new();

    for record in records {
        let key = (
            record.purchase_timestamp.year(),
            record.purchase_timestamp.month(),
        );
        map.entry(key).or_default().add(record);
    }

    map.into_iter()
        .map(|((year, month), acc)| MonthlySummaryRow {
            period: format!("{year:04}-{month:02}"),
            year,
            // chrono guarantees month in 1..=12
            month: MONTH_ABBREVS[month as usize - 1].to_string(),
            order_count: acc.orders.len() as u64,
            revenue: acc.revenue,
        })
        .collect()
}

// ── Distinct-customer groupings ───────────────────────────────────────────────

/// Generic grouping driver: count distinct customers per value of the
/// field selected by `key_fn`. Output order is ascending group key; any
/// top-N ordering is the caller's job.
fn distinct_customers_by<'a>(
    records: &'a [OrderRecord],
    key_fn: impl Fn(&'a OrderRecord) -> &'a str,
) -> Vec<CustomerCountRow> {
    let mut map: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for record in records {
        map.entry(key_fn(record))
            .or_default()
            .insert(record.customer_id.as_str());
    }

    map.into_iter()
        .map(|(label, customers)| CustomerCountRow {
            label: label.to_string(),
            customer_count: customers.len() as u64,
        })
        .collect()
}

/// Distinct customers per state.
pub fn customers_by_state(records: &[OrderRecord]) -> Vec<CustomerCountRow> {
    distinct_customers_by(records, |r| r.customer_state.as_str())
}

/// Distinct customers per city.
pub fn customers_by_city(records: &[OrderRecord]) -> Vec<CustomerCountRow> {
    distinct_customers_by(records, |r| r.customer_city.as_str())
}

/// Distinct customers per payment type.
pub fn customers_by_payment_type(records: &[OrderRecord]) -> Vec<CustomerCountRow> {
    distinct_customers_by(records, |r| r.payment_type.as_str())
}

// ── Category order volume ─────────────────────────────────────────────────────

/// Order-item volume per product category, sorted descending by volume.
///
/// The measure is the sum of the line-item sequence numbers, not a row
/// count — that is the source data's standing proxy for "total items
/// ordered" and consumers compare against reference output, so it must
/// not be "corrected" to a count. Grouping is by the raw category name;
/// the label is normalized afterwards. The descending sort is stable
/// over the ascending raw-name iteration, so ties keep name order.
pub fn category_order_volume(records: &[OrderRecord]) -> Vec<CategoryVolumeRow> {
    let mut map: BTreeMap<&str, u64> = BTreeMap::new();

    for record in records {
        *map.entry(record.product_category.as_str()).or_default() +=
            u64::from(record.order_item_id);
    }

    let mut totals: Vec<(&str, u64)> = map.into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    totals
        .into_iter()
        .map(|(raw, items_ordered)| CategoryVolumeRow {
            category: normalize_category_name(raw),
            items_ordered,
        })
        .collect()
}

// ── RFM ───────────────────────────────────────────────────────────────────────

/// Recency/frequency/monetary per customer.
///
/// Recency is measured against a single anchor: the latest purchase
/// date anywhere in the dataset (date precision), so recency is
/// comparable across customers and the most recent buyer lands at 0.
/// Rows come out in ascending customer-id order and `USER_{n:03}`
/// labels are assigned positionally over that order.
pub fn rfm_table(records: &[OrderRecord]) -> Vec<RfmRow> {
    let Some(anchor) = records.iter().map(|r| r.purchase_date()).max() else {
        return Vec::new();
    };

    let mut map: BTreeMap<&str, RfmAccumulator<'_>> = BTreeMap::new();
    for record in records {
        match map.entry(record.customer_id.as_str()) {
            std::collections::btree_map::Entry::Occupied(mut e) => e.get_mut().add(record),
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(RfmAccumulator::new(record));
            }
        }
    }

    map.into_iter()
        .enumerate()
        .map(|(i, (customer_id, acc))| RfmRow {
            customer_id: customer_id.to_string(),
            frequency: acc.orders.len() as u64,
            monetary: acc.monetary,
            recency_days: (anchor - acc.last_purchase).num_days(),
            customer_label: format!("USER_{:03}", i + 1),
        })
        .collect()
}

/// Mean recency/frequency/monetary over the RFM table.
///
/// Returns `None` for an empty table — the caller shows "no data"
/// instead of a division-by-zero artefact.
pub fn rfm_averages(rows: &[RfmRow]) -> Option<RfmAverages> {
    if rows.is_empty() {
        return None;
    }
    let n = rows.len() as f64;
    Some(RfmAverages {
        recency_days: rows.iter().map(|r| r.recency_days as f64).sum::<f64>() / n,
        frequency: rows.iter().map(|r| r.frequency as f64).sum::<f64>() / n,
        monetary: rows.iter().map(|r| r.monetary).sum::<f64>() / n,
    })
}

// ── Payment share ─────────────────────────────────────────────────────────────

/// Share of order lines per payment type, in percent, sorted descending.
///
/// Counts rows, not distinct customers — this backs the payment-methods
/// distribution chart, which is a different measure from
/// [`customers_by_payment_type`].
pub fn payment_type_share(records: &[OrderRecord]) -> Vec<PaymentShareRow> {
    if records.is_empty() {
        return Vec::new();
    }
    let total = records.len() as f64;

    let mut map: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *map.entry(record.payment_type.as_str()).or_default() += 1;
    }

    let mut counts: Vec<(&str, u64)> = map.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(raw, count)| PaymentShareRow {
            payment_type: normalize_category_name(raw),
            share_pct: count as f64 / total * 100.0,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn make_record(order_id: &str, customer_id: &str, ts: &str, price: f64) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_city: "sao paulo".to_string(),
            customer_state: "SP".to_string(),
            product_category: "toys".to_string(),
            order_item_id: 1,
            price,
            payment_type: "credit_card".to_string(),
            purchase_timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            approved_at: None,
            delivered_carrier_date: None,
            delivered_customer_date: None,
            estimated_delivery_date: None,
            shipping_limit_date: None,
        }
    }

    // ── yearly_summary ─────────────────────────────────────────────────────

    #[test]
    fn test_yearly_groups_by_year() {
        let records = vec![
            make_record("o1", "c1", "2017-05-01 10:00:00", 10.0),
            make_record("o2", "c1", "2017-09-01 10:00:00", 20.0),
            make_record("o3", "c2", "2018-01-01 10:00:00", 30.0),
        ];
        let rows = yearly_summary(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, "2017");
        assert_eq!(rows[0].order_count, 2);
        assert!((rows[0].revenue - 30.0).abs() < 1e-9);
        assert_eq!(rows[1].year, "2018");
        assert_eq!(rows[1].order_count, 1);
    }

    #[test]
    fn test_yearly_counts_orders_once_across_line_items() {
        // One order with three line items.
        let records = vec![
            make_record("o1", "c1", "2018-01-01 10:00:00", 10.0),
            make_record("o1", "c1", "2018-01-01 10:00:00", 20.0),
            make_record("o1", "c1", "2018-01-01 10:00:00", 30.0),
        ];
        let rows = yearly_summary(&records);

        assert_eq!(rows[0].order_count, 1);
        assert!((rows[0].revenue - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_yearly_empty_dataset() {
        assert!(yearly_summary(&[]).is_empty());
    }

    #[test]
    fn test_yearly_counts_sum_to_dataset_distinct_orders() {
        let records = vec![
            make_record("o1", "c1", "2016-12-31 23:59:59", 1.0),
            make_record("o1", "c1", "2016-12-31 23:59:59", 2.0),
            make_record("o2", "c2", "2017-06-15 00:00:00", 3.0),
            make_record("o3", "c3", "2018-02-01 00:00:00", 4.0),
            make_record("o4", "c3", "2018-03-01 00:00:00", 5.0),
        ];
        let rows = yearly_summary(&records);

        let per_year_total: u64 = rows.iter().map(|r| r.order_count).sum();
        let distinct: HashSet<&str> = records.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(per_year_total, distinct.len() as u64);
    }

    // ── monthly_summary ────────────────────────────────────────────────────

    #[test]
    fn test_monthly_groups_by_year_and_month() {
        let records = vec![
            make_record("o1", "c1", "2017-01-05 10:00:00", 10.0),
            make_record("o2", "c1", "2017-01-20 10:00:00", 20.0),
            make_record("o3", "c2", "2017-02-01 10:00:00", 30.0),
        ];
        let rows = monthly_summary(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period, "2017-01");
        assert_eq!(rows[0].month, "Jan");
        assert_eq!(rows[0].year, 2017);
        assert_eq!(rows[0].order_count, 2);
        assert_eq!(rows[1].period, "2017-02");
        assert_eq!(rows[1].month, "Feb");
    }

    #[test]
    fn test_monthly_chronological_across_year_boundary() {
        // Same month label in different years, input deliberately shuffled.
        let records = vec![
            make_record("o3", "c1", "2018-01-10 00:00:00", 1.0),
            make_record("o1", "c1", "2017-01-10 00:00:00", 1.0),
            make_record("o2", "c1", "2017-12-10 00:00:00", 1.0),
        ];
        let rows = monthly_summary(&records);

        let periods: Vec<&str> = rows.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["2017-01", "2017-12", "2018-01"]);
    }

    #[test]
    fn test_monthly_empty_dataset() {
        assert!(monthly_summary(&[]).is_empty());
    }

    // ── customers_by_* ─────────────────────────────────────────────────────

    #[test]
    fn test_by_state_distinct_customer_counts() {
        let mut a = make_record("o1", "A", "2018-01-01 00:00:00", 1.0);
        a.customer_state = "SP".to_string();
        let mut b = make_record("o2", "B", "2018-01-02 00:00:00", 1.0);
        b.customer_state = "SP".to_string();
        let mut c = make_record("o3", "C", "2018-01-03 00:00:00", 1.0);
        c.customer_state = "RJ".to_string();

        let rows = customers_by_state(&[a, b, c]);

        assert_eq!(rows.len(), 2);
        let sp = rows.iter().find(|r| r.label == "SP").unwrap();
        let rj = rows.iter().find(|r| r.label == "RJ").unwrap();
        assert_eq!(sp.customer_count, 2);
        assert_eq!(rj.customer_count, 1);
    }

    #[test]
    fn test_by_state_customer_with_many_orders_counts_once() {
        let records = vec![
            make_record("o1", "c1", "2018-01-01 00:00:00", 1.0),
            make_record("o2", "c1", "2018-02-01 00:00:00", 1.0),
            make_record("o3", "c1", "2018-03-01 00:00:00", 1.0),
        ];
        let rows = customers_by_state(&records);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_count, 1);
    }

    #[test]
    fn test_by_city_groups_on_city() {
        let mut a = make_record("o1", "c1", "2018-01-01 00:00:00", 1.0);
        a.customer_city = "campinas".to_string();
        let b = make_record("o2", "c2", "2018-01-02 00:00:00", 1.0);

        let rows = customers_by_city(&[a, b]);

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert!(labels.contains(&"campinas"));
        assert!(labels.contains(&"sao paulo"));
    }

    #[test]
    fn test_by_payment_type_groups_on_payment() {
        let mut a = make_record("o1", "c1", "2018-01-01 00:00:00", 1.0);
        a.payment_type = "boleto".to_string();
        let b = make_record("o2", "c2", "2018-01-02 00:00:00", 1.0);
        let c = make_record("o3", "c3", "2018-01-03 00:00:00", 1.0);

        let rows = customers_by_payment_type(&[a, b, c]);

        let boleto = rows.iter().find(|r| r.label == "boleto").unwrap();
        let credit = rows.iter().find(|r| r.label == "credit_card").unwrap();
        assert_eq!(boleto.customer_count, 1);
        assert_eq!(credit.customer_count, 2);
    }

    #[test]
    fn test_customers_by_empty_dataset() {
        assert!(customers_by_state(&[]).is_empty());
        assert!(customers_by_city(&[]).is_empty());
        assert!(customers_by_payment_type(&[]).is_empty());
    }

    // ── category_order_volume ──────────────────────────────────────────────

    #[test]
    fn test_category_volume_sorted_descending_with_normalized_labels() {
        let mut rows_in = Vec::new();
        // electronics: item ids summing to 50.
        for item_id in [20, 30] {
            let mut r = make_record("o1", "c1", "2018-01-01 00:00:00", 1.0);
            r.product_category = "electronics".to_string();
            r.order_item_id = item_id;
            rows_in.push(r);
        }
        // toys: item ids summing to 5.
        let mut toy = make_record("o2", "c2", "2018-01-02 00:00:00", 1.0);
        toy.order_item_id = 5;
        rows_in.push(toy);

        let rows = category_order_volume(&rows_in);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Electronics");
        assert_eq!(rows[0].items_ordered, 50);
        assert_eq!(rows[1].category, "Toys");
        assert_eq!(rows[1].items_ordered, 5);
    }

    #[test]
    fn test_category_volume_sums_sequence_numbers_not_rows() {
        // Two rows with item ids 2 and 3 → 5, not a row count of 2.
        let mut a = make_record("o1", "c1", "2018-01-01 00:00:00", 1.0);
        a.order_item_id = 2;
        let mut b = make_record("o1", "c1", "2018-01-01 00:00:00", 1.0);
        b.order_item_id = 3;

        let rows = category_order_volume(&[a, b]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].items_ordered, 5);
    }

    #[test]
    fn test_category_volume_underscore_names_normalized() {
        let mut r = make_record("o1", "c1", "2018-01-01 00:00:00", 1.0);
        r.product_category = "bed_bath_table".to_string();

        let rows = category_order_volume(&[r]);
        assert_eq!(rows[0].category, "Bed Bath Table");
    }

    #[test]
    fn test_category_volume_empty_dataset() {
        assert!(category_order_volume(&[]).is_empty());
    }

    // ── rfm_table ──────────────────────────────────────────────────────────

    #[test]
    fn test_rfm_single_customer_example() {
        // 3 orders on 2018-01-01, 2018-01-10, 2018-02-01 with prices
        // 10, 20, 30 → frequency 3, monetary 60, recency 0.
        let records = vec![
            make_record("o1", "c1", "2018-01-01 09:00:00", 10.0),
            make_record("o2", "c1", "2018-01-10 09:00:00", 20.0),
            make_record("o3", "c1", "2018-02-01 09:00:00", 30.0),
        ];
        let rows = rfm_table(&records);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].frequency, 3);
        assert!((rows[0].monetary - 60.0).abs() < 1e-9);
        assert_eq!(rows[0].recency_days, 0);
        assert_eq!(rows[0].customer_label, "USER_001");
    }

    #[test]
    fn test_rfm_recency_relative_to_global_anchor() {
        let records = vec![
            make_record("o1", "c1", "2018-01-01 09:00:00", 10.0),
            make_record("o2", "c2", "2018-01-31 23:00:00", 20.0),
        ];
        let rows = rfm_table(&records);

        let c1 = rows.iter().find(|r| r.customer_id == "c1").unwrap();
        let c2 = rows.iter().find(|r| r.customer_id == "c2").unwrap();
        assert_eq!(c1.recency_days, 30);
        assert_eq!(c2.recency_days, 0);
    }

    #[test]
    fn test_rfm_recency_never_negative() {
        let records = vec![
            make_record("o1", "c1", "2017-03-01 00:00:00", 1.0),
            make_record("o2", "c2", "2017-06-01 00:00:00", 1.0),
            make_record("o3", "c3", "2018-11-30 00:00:00", 1.0),
        ];
        for row in rfm_table(&records) {
            assert!(row.recency_days >= 0, "recency for {}", row.customer_id);
        }
    }

    #[test]
    fn test_rfm_recency_uses_date_precision() {
        // Same date, different times of day → 0 days apart.
        let records = vec![
            make_record("o1", "c1", "2018-01-01 00:00:01", 1.0),
            make_record("o2", "c2", "2018-01-01 23:59:59", 1.0),
        ];
        let rows = rfm_table(&records);
        assert!(rows.iter().all(|r| r.recency_days == 0));
    }

    #[test]
    fn test_rfm_frequency_counts_distinct_orders() {
        // Two line items of one order plus a second order.
        let records = vec![
            make_record("o1", "c1", "2018-01-01 00:00:00", 5.0),
            make_record("o1", "c1", "2018-01-01 00:00:00", 5.0),
            make_record("o2", "c1", "2018-01-05 00:00:00", 5.0),
        ];
        let rows = rfm_table(&records);

        assert_eq!(rows[0].frequency, 2);
        assert!((rows[0].monetary - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_rfm_labels_follow_ascending_customer_id() {
        // Input order is descending; labels must follow ascending ids.
        let records = vec![
            make_record("o3", "c-zz", "2018-01-03 00:00:00", 1.0),
            make_record("o2", "c-mm", "2018-01-02 00:00:00", 1.0),
            make_record("o1", "c-aa", "2018-01-01 00:00:00", 1.0),
        ];
        let rows = rfm_table(&records);

        assert_eq!(rows[0].customer_id, "c-aa");
        assert_eq!(rows[0].customer_label, "USER_001");
        assert_eq!(rows[1].customer_id, "c-mm");
        assert_eq!(rows[1].customer_label, "USER_002");
        assert_eq!(rows[2].customer_id, "c-zz");
        assert_eq!(rows[2].customer_label, "USER_003");
    }

    #[test]
    fn test_rfm_label_zero_padding() {
        let records: Vec<OrderRecord> = (0..12)
            .map(|i| {
                make_record(
                    &format!("o{i}"),
                    &format!("c{i:02}"),
                    "2018-01-01 00:00:00",
                    1.0,
                )
            })
            .collect();
        let rows = rfm_table(&records);

        assert_eq!(rows[0].customer_label, "USER_001");
        assert_eq!(rows[9].customer_label, "USER_010");
        assert_eq!(rows[11].customer_label, "USER_012");
    }

    #[test]
    fn test_rfm_empty_dataset() {
        assert!(rfm_table(&[]).is_empty());
    }

    #[test]
    fn test_rfm_idempotent() {
        let records = vec![
            make_record("o1", "c1", "2018-01-01 00:00:00", 10.0),
            make_record("o2", "c2", "2018-02-01 00:00:00", 20.0),
        ];
        assert_eq!(rfm_table(&records), rfm_table(&records));
    }

    // ── rfm_averages ───────────────────────────────────────────────────────

    #[test]
    fn test_rfm_averages_values() {
        let records = vec![
            make_record("o1", "c1", "2018-01-01 00:00:00", 10.0),
            make_record("o2", "c2", "2018-01-11 00:00:00", 30.0),
        ];
        let averages = rfm_averages(&rfm_table(&records)).unwrap();

        // recency: c1 = 10, c2 = 0 → mean 5.
        assert!((averages.recency_days - 5.0).abs() < 1e-9);
        assert!((averages.frequency - 1.0).abs() < 1e-9);
        assert!((averages.monetary - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_rfm_averages_empty_is_none() {
        assert!(rfm_averages(&[]).is_none());
    }

    // ── payment_type_share ─────────────────────────────────────────────────

    #[test]
    fn test_payment_share_percentages() {
        let mut rows_in = vec![
            make_record("o1", "c1", "2018-01-01 00:00:00", 1.0),
            make_record("o2", "c2", "2018-01-02 00:00:00", 1.0),
            make_record("o3", "c3", "2018-01-03 00:00:00", 1.0),
        ];
        rows_in[2].payment_type = "boleto".to_string();

        let rows = payment_type_share(&rows_in);

        assert_eq!(rows.len(), 2);
        // Sorted descending: credit card first with 2/3 of rows.
        assert_eq!(rows[0].payment_type, "Credit Card");
        assert!((rows[0].share_pct - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(rows[1].payment_type, "Boleto");

        let total: f64 = rows.iter().map(|r| r.share_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_payment_share_empty_dataset() {
        assert!(payment_type_share(&[]).is_empty());
    }

    // ── Idempotence across the pipeline ────────────────────────────────────

    #[test]
    fn test_tables_idempotent() {
        let records = vec![
            make_record("o1", "c1", "2017-03-01 00:00:00", 10.0),
            make_record("o2", "c2", "2017-06-01 00:00:00", 20.0),
            make_record("o3", "c1", "2018-11-30 00:00:00", 30.0),
        ];

        assert_eq!(yearly_summary(&records), yearly_summary(&records));
        assert_eq!(monthly_summary(&records), monthly_summary(&records));
        assert_eq!(customers_by_state(&records), customers_by_state(&records));
        assert_eq!(
            category_order_volume(&records),
            category_order_volume(&records)
        );
        assert_eq!(payment_type_share(&records), payment_type_share(&records));
    }
}
