//! Expiry month/year range checks and the expiration test.
//!
//! Month and year values arrive as whatever the host put in the record:
//! zero-padded text, plain numbers, or garbage. Text goes through a shape
//! check first (months reject more than two characters, years anything but
//! exactly four); numeric input skips the shape check and is judged by range
//! alone. Both then coerce through [`FieldValue::to_int`], so non-numeric
//! input lands at 0 and fails conservatively.

use chrono::{Datelike, Utc};

use crate::config::{self, Config, ExpiryRange};
use crate::field::FieldValue;

fn check_month(value: FieldValue<'_>, range: Option<&ExpiryRange>) -> bool {
    if let Some(text) = value.as_text() {
        // Rejects inputs like "003" no matter what they coerce to.
        if text.chars().count() > 2 {
            return false;
        }
    }
    let Some(range) = range else {
        return false;
    };
    range.contains(value.to_int())
}

fn check_year(value: FieldValue<'_>, range: Option<&ExpiryRange>) -> bool {
    if let Some(text) = value.as_text() {
        if text.chars().count() != 4 {
            return false;
        }
    }
    let Some(range) = range else {
        return false;
    };
    range.contains(value.to_int())
}

/// Checks an expiry month against a range, defaulting to the live
/// registry's month range (1 through 12).
///
/// A textual month longer than two characters is invalid regardless of its
/// numeric value.
///
/// # Example
///
/// ```
/// use credit_card::{is_valid_expiry_month, ExpiryRange};
///
/// assert!(is_valid_expiry_month("03", None));
/// assert!(is_valid_expiry_month(12, None));
/// assert!(!is_valid_expiry_month(0, None));
/// assert!(!is_valid_expiry_month("003", None));
/// assert!(is_valid_expiry_month(13, Some(&ExpiryRange::new(13, 13))));
/// ```
pub fn is_valid_expiry_month<'a>(
    month: impl Into<FieldValue<'a>>,
    range: Option<&ExpiryRange>,
) -> bool {
    match range {
        Some(range) => check_month(month.into(), Some(range)),
        None => check_month(month.into(), config::get_defaults().expiry_months()),
    }
}

/// [`is_valid_expiry_month`] against an explicit registry.
pub fn is_valid_expiry_month_with<'a>(config: &Config, month: impl Into<FieldValue<'a>>) -> bool {
    check_month(month.into(), config.expiry_months())
}

/// Checks an expiry year against a range, defaulting to the live registry's
/// year range (1900 through 2200).
///
/// A textual year must be exactly four characters; numeric input skips the
/// shape check and is judged by range alone, so `100` and `"100"` are
/// rejected by different rules.
///
/// # Example
///
/// ```
/// use credit_card::is_valid_expiry_year;
///
/// assert!(is_valid_expiry_year("2014", None));
/// assert!(is_valid_expiry_year(1900, None));
/// assert!(!is_valid_expiry_year(1899, None));
/// assert!(!is_valid_expiry_year("100", None));
/// ```
pub fn is_valid_expiry_year<'a>(
    year: impl Into<FieldValue<'a>>,
    range: Option<&ExpiryRange>,
) -> bool {
    match range {
        Some(range) => check_year(year.into(), Some(range)),
        None => check_year(year.into(), config::get_defaults().expiry_years()),
    }
}

/// [`is_valid_expiry_year`] against an explicit registry.
pub fn is_valid_expiry_year_with<'a>(config: &Config, year: impl Into<FieldValue<'a>>) -> bool {
    check_year(year.into(), config.expiry_years())
}

/// Reports whether a card with the given expiry month and year has expired.
///
/// A card is good through the end of its expiry month and becomes expired at
/// the first instant of the following month. Both inputs coerce like every
/// other field, so missing or non-numeric values land at month 0 of year 0
/// and report expired. Out-of-range months normalize arithmetically: month
/// 13 of a year is January of the next.
///
/// # Example
///
/// ```
/// use credit_card::is_expired;
///
/// assert!(is_expired(12, 2013));
/// assert!(!is_expired(1, 2100));
/// assert!(is_expired("", ""));
/// ```
pub fn is_expired<'a, 'b>(
    month: impl Into<FieldValue<'a>>,
    year: impl Into<FieldValue<'b>>,
) -> bool {
    let now = Utc::now();
    let now_index = i64::from(now.year()) * 12 + i64::from(now.month()) - 1;
    expired_at(month.into().to_int(), year.into().to_int(), now_index)
}

/// Compares on the month axis (`year * 12 + zero-based month`). The boundary
/// index `year * 12 + month` with a one-based month is exactly the month
/// after the expiry month.
fn expired_at(month: i64, year: i64, now_index: i64) -> bool {
    let boundary = year.saturating_mul(12).saturating_add(month);
    now_index >= boundary
}
