use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The metric plotted in the monthly trend view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Count of distinct order ids.
    OrderCount,
    /// Summed item price.
    Revenue,
}

impl Metric {
    /// Human-readable name used in report headings.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::OrderCount => "Order Count",
            Metric::Revenue => "Revenue",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::OrderCount => write!(f, "order-count"),
            Metric::Revenue => write!(f, "revenue"),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "order-count" | "order_count" | "orders" => Ok(Metric::OrderCount),
            "revenue" => Ok(Metric::Revenue),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// The year narrowing applied to the monthly trend view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    /// Aggregate every year together, one row per month label.
    All,
    /// Restrict to a single calendar year.
    Year(i32),
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => write!(f, "all"),
            YearFilter::Year(y) => write!(f, "{y}"),
        }
    }
}

impl FromStr for YearFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        match s.parse::<i32>() {
            Ok(y) if (1000..=9999).contains(&y) => Ok(YearFilter::Year(y)),
            _ => Err(format!("year must be \"all\" or a 4-digit year, got: {s}")),
        }
    }
}

/// One order line item from the pre-joined e-commerce dataset.
///
/// Rows are immutable once loaded; every aggregation reads them by
/// reference. The purchase timestamp is the only timestamp field the
/// pipeline keys on — the lifecycle timestamps are carried for
/// completeness and may be absent in the source export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order identifier (an order spans one or more line items).
    pub order_id: String,
    /// Customer identifier.
    pub customer_id: String,
    /// Customer city name.
    pub customer_city: String,
    /// Two-letter customer state code.
    pub customer_state: String,
    /// Product category name (raw export form, e.g. `"home_comfort_2"`).
    pub product_category: String,
    /// Line-item sequence number within the order (1-based).
    pub order_item_id: u32,
    /// Item price in USD.
    pub price: f64,
    /// Payment type (raw export form, e.g. `"credit_card"`).
    pub payment_type: String,
    /// When the order was placed. Always present.
    pub purchase_timestamp: NaiveDateTime,
    /// When the order was approved.
    pub approved_at: Option<NaiveDateTime>,
    /// When the order was handed to the carrier.
    pub delivered_carrier_date: Option<NaiveDateTime>,
    /// When the order reached the customer.
    pub delivered_customer_date: Option<NaiveDateTime>,
    /// Estimated delivery date promised at purchase time.
    pub estimated_delivery_date: Option<NaiveDateTime>,
    /// Shipping deadline for the seller.
    pub shipping_limit_date: Option<NaiveDateTime>,
}

impl OrderRecord {
    /// Date-only view of the purchase timestamp.
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_timestamp.date()
    }
}

/// Normalise a raw category or payment-type name into its display form:
/// underscores become spaces and each word is title-cased.
///
/// Title casing follows the convention of the source data's export
/// tooling: an alphabetic character is uppercased when it follows a
/// non-alphabetic character (or starts the string) and lowercased
/// otherwise, so digits also start a new word.
///
/// # Examples
///
/// ```
/// use dashboard_core::models::normalize_category_name;
///
/// assert_eq!(normalize_category_name("electronics"), "Electronics");
/// assert_eq!(normalize_category_name("home_comfort_2"), "Home Comfort 2");
/// assert_eq!(normalize_category_name("credit_card"), "Credit Card");
/// ```
pub fn normalize_category_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for ch in raw.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
