//! Field match predicates: card number and CVV against a named card type.
//!
//! Every predicate reports invalidity as `false`. An unknown type name, an
//! absent pattern, or non-textual input all fail the check rather than
//! raising an error.

use zeroize::Zeroizing;

use crate::config::{self, CardTypeOverrides, Config, ConfigOverrides};
use crate::luhn;
use crate::sanitize::sanitize_digits;

fn merged_for(card_types: Option<&CardTypeOverrides>) -> Config {
    match card_types {
        Some(overrides) => {
            let patch = ConfigOverrides {
                card_types: overrides.clone(),
                ..ConfigOverrides::default()
            };
            config::get_defaults().merged(&patch)
        }
        None => config::get_defaults(),
    }
}

/// Tests a number against the named type's full-number pattern, using the
/// live registry optionally patched with `card_types`.
///
/// # Example
///
/// ```
/// use credit_card::number_matches_type;
///
/// assert!(number_matches_type("4111111111111111", "VISA", None));
/// assert!(!number_matches_type("4111111111111111", "AMERICANEXPRESS", None));
/// assert!(!number_matches_type("4111111111111111", "no such type", None));
/// ```
pub fn number_matches_type(
    number: &str,
    type_name: &str,
    card_types: Option<&CardTypeOverrides>,
) -> bool {
    number_matches_type_with(&merged_for(card_types), number, type_name)
}

/// Tests a number against the named type's full-number pattern in an
/// explicit registry. The number is sanitized before matching; unknown type
/// names fail.
pub fn number_matches_type_with(config: &Config, number: &str, type_name: &str) -> bool {
    let digits = Zeroizing::new(sanitize_digits(number));
    config
        .card_type(type_name)
        .and_then(|t| t.number_pattern())
        .map_or(false, |pattern| pattern.matches(&digits))
}

/// Tests a CVV against the named type's CVV pattern, using the live registry
/// optionally patched with `card_types`.
pub fn cvv_matches_type(cvv: &str, type_name: &str, card_types: Option<&CardTypeOverrides>) -> bool {
    cvv_matches_type_with(&merged_for(card_types), cvv, type_name)
}

/// Tests a CVV against the named type's CVV pattern in an explicit registry.
pub fn cvv_matches_type_with(config: &Config, cvv: &str, type_name: &str) -> bool {
    let digits = Zeroizing::new(sanitize_digits(cvv));
    config
        .card_type(type_name)
        .and_then(|t| t.cvv_pattern())
        .map_or(false, |pattern| pattern.matches(&digits))
}

/// Checks that a number both matches the named type's pattern and passes the
/// Luhn checksum. Both conditions are required: a number can fit a brand's
/// format and still carry a transcription error.
///
/// # Example
///
/// ```
/// use credit_card::is_valid_card_number;
///
/// assert!(is_valid_card_number("4111111111111111", "VISA", None));
/// // Right format, wrong check digit.
/// assert!(!is_valid_card_number("4111111111111112", "VISA", None));
/// ```
pub fn is_valid_card_number(
    number: &str,
    type_name: &str,
    card_types: Option<&CardTypeOverrides>,
) -> bool {
    is_valid_card_number_with(&merged_for(card_types), number, type_name)
}

/// [`is_valid_card_number`] against an explicit registry.
pub fn is_valid_card_number_with(config: &Config, number: &str, type_name: &str) -> bool {
    let digits = Zeroizing::new(sanitize_digits(number));
    number_matches_type_with(config, &digits, type_name) && luhn::validate(&digits)
}
