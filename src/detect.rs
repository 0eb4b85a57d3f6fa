//! Card type detection from full or partial numbers.
//!
//! Detection walks the registry's card types in insertion order, so the
//! built-in brands are consulted before any custom types merged in later.
//! Because aliases resolve to canonical definitions, detection always
//! reports the canonical type name, never an alias key.

use zeroize::Zeroizing;

use crate::config::{self, Config};
use crate::sanitize::sanitize_digits;
use crate::validate::ValidationOptions;

/// Detects the card type of a number against the live registry.
///
/// The number is sanitized first. A first pass returns the first type whose
/// full-number pattern matches; when nothing matches and
/// [`ValidationOptions::allow_partial`] is set, a second pass returns the
/// first type whose prefix pattern matches the (possibly short) input.
///
/// # Example
///
/// ```
/// use credit_card::{detect_card_type, ValidationOptions};
///
/// assert_eq!(
///     detect_card_type("4111-1111-1111-1111", None).as_deref(),
///     Some("VISA")
/// );
/// assert_eq!(detect_card_type("0000000000000000", None), None);
///
/// // Prefix detection for live-typing feedback.
/// assert_eq!(detect_card_type("4", None), None);
/// let partial = ValidationOptions::new().allow_partial(true);
/// assert_eq!(detect_card_type("4", Some(&partial)).as_deref(), Some("VISA"));
/// ```
pub fn detect_card_type(number: &str, options: Option<&ValidationOptions>) -> Option<String> {
    let config = match options {
        Some(opts) => config::get_defaults().merged(&opts.overrides),
        None => config::get_defaults(),
    };
    let allow_partial = options.map_or(false, |opts| opts.allow_partial);
    detect_card_type_with(&config, number, allow_partial).map(str::to_owned)
}

/// Detects the card type against an explicit registry. Returns the canonical
/// name borrowed from the registry.
pub fn detect_card_type_with<'c>(
    config: &'c Config,
    number: &str,
    allow_partial: bool,
) -> Option<&'c str> {
    let digits = Zeroizing::new(sanitize_digits(number));

    for card_type in config.card_types() {
        if card_type
            .number_pattern()
            .map_or(false, |p| p.matches(&digits))
        {
            return Some(card_type.name());
        }
    }

    if allow_partial {
        for card_type in config.card_types() {
            if card_type
                .partial_pattern()
                .map_or(false, |p| p.matches(&digits))
            {
                return Some(card_type.name());
            }
        }
    }

    None
}
