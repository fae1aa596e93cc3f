//! Calendar helpers shared by the aggregation pipeline and the report.
//!
//! Month labels are three-letter English abbreviations and are used as
//! cross-year grouping keys, so their chronological order (Jan..Dec) has
//! to be recoverable from the label — plain lexical sorting would put
//! "Apr" before "Jan".

/// Abbreviated month names in chronological order.
pub const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Abbreviated name for a 1-based calendar month number.
///
/// # Examples
///
/// ```
/// use dashboard_core::time_utils::month_abbrev;
///
/// assert_eq!(month_abbrev(1), Some("Jan"));
/// assert_eq!(month_abbrev(12), Some("Dec"));
/// assert_eq!(month_abbrev(13), None);
/// ```
pub fn month_abbrev(month: u32) -> Option<&'static str> {
    MONTH_ABBREVS.get(month.checked_sub(1)? as usize).copied()
}

/// 1-based calendar month number for an abbreviated label.
///
/// The inverse of [`month_abbrev`]; this is what makes month labels
/// sortable chronologically.
///
/// # Examples
///
/// ```
/// use dashboard_core::time_utils::month_number;
///
/// assert_eq!(month_number("Jan"), Some(1));
/// assert_eq!(month_number("Dec"), Some(12));
/// assert_eq!(month_number("Janx"), None);
/// ```
pub fn month_number(label: &str) -> Option<u32> {
    MONTH_ABBREVS
        .iter()
        .position(|&m| m == label)
        .map(|i| i as u32 + 1)
}

/// Format a calendar year as the 4-digit label used in the yearly table.
pub fn year_label(year: i32) -> String {
    format!("{year:04}")
}
