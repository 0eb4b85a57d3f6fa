//! Digit sanitization for card numbers and CVVs.

use crate::field::FieldValue;

/// Strips everything that is not an ASCII digit from a textual input,
/// preserving digit order. Non-textual inputs sanitize to an empty string;
/// this function never fails.
///
/// # Example
///
/// ```
/// use credit_card::{sanitize_digits, FieldValue};
///
/// assert_eq!(sanitize_digits("4111-1111-1111-1111"), "4111111111111111");
/// assert_eq!(sanitize_digits("4111 1111 1111 1111"), "4111111111111111");
/// assert_eq!(sanitize_digits(FieldValue::Absent), "");
/// ```
pub fn sanitize_digits<'a>(input: impl Into<FieldValue<'a>>) -> String {
    match input.into() {
        FieldValue::Text(s) => s.chars().filter(char::is_ascii_digit).collect(),
        _ => String::new(),
    }
}
