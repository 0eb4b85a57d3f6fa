//! # credit-card
//!
//! Stateless validation of payment-card field data: card number pattern and
//! Luhn checksum, card type detection, CVV format, and expiry checks. This
//! crate is an embeddable utility for card-entry forms; it stores nothing,
//! performs no I/O, and never decides whether a card is genuine - only
//! whether its fields are well-formed.
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//!
//! let card = json!({
//!     "cardType": "VISA",
//!     "number": "4111-1111-1111-1111",
//!     "expiryMonth": "03",
//!     "expiryYear": "2100",
//!     "cvv": "123",
//! });
//!
//! let report = credit_card::validate(&card, None);
//! assert!(report.valid_card_number);
//! assert!(report.valid_expiry_month);
//! assert!(report.valid_expiry_year);
//! assert!(report.valid_cvv);
//! assert!(!report.is_expired);
//! ```
//!
//! ## Detection
//!
//! ```rust
//! use credit_card::{detect_card_type, ValidationOptions};
//!
//! assert_eq!(detect_card_type("4111111111111111", None).as_deref(), Some("VISA"));
//!
//! // Prefix detection for live-typing feedback.
//! let options = ValidationOptions::new().allow_partial(true);
//! assert_eq!(detect_card_type("37", Some(&options)).as_deref(), Some("AMERICANEXPRESS"));
//! ```
//!
//! ## Configuration
//!
//! The registry of card types, aliases, expiry ranges, and the field schema
//! is an ordinary value. Build your own with [`Config::built_in`] and pass
//! it to the `*_with` entry points, or reconfigure the process-wide registry
//! with [`set_defaults`] / [`reset_defaults`]:
//!
//! ```rust
//! use credit_card::{
//!     CardTypeOverride, Config, ConfigOverrides, Pattern, ValidationOptions,
//! };
//! use serde_json::json;
//!
//! // A gift card brand that only this call knows about.
//! let options = ValidationOptions::new().overrides(ConfigOverrides::new().card_type(
//!     "GIFT_CARD",
//!     CardTypeOverride::new()
//!         .number_pattern(Pattern::new(r"^4[0-9]{12}(?:[0-9]{3})?$").unwrap())
//!         .cvv_pattern(Pattern::new(r".*").unwrap()),
//! ));
//!
//! let card = json!({
//!     "cardType": "GIFT_CARD",
//!     "number": "4111111111111111",
//!     "expiryMonth": "03",
//!     "expiryYear": "2100",
//! });
//! let report = credit_card::validate_with(&Config::built_in(), &card, Some(&options));
//! assert!(report.valid_card_number);
//! ```
//!
//! ## Built-in card types
//!
//! | Type | Aliases | CVV |
//! |------|---------|-----|
//! | VISA | `vc`, `VC`, `visa` | 3 digits |
//! | MASTERCARD | `mc`, `MC`, `mastercard`, `master card`, `MASTER CARD` | 3 digits |
//! | AMERICANEXPRESS | `ae`, `AE`, `ax`, `AX`, `amex`, `AMEX`, `american express`, `AMERICAN EXPRESS` | 4 digits |
//! | DINERSCLUB | `dinersclub` | 3 digits |
//! | DISCOVER | `dc`, `DC`, `discover` | 3 digits |
//! | JCB | `jcb` | 3 digits |
//!
//! MASTERCARD matches both the 51-55 ranges and the 2221-2720 BIN extension.
//!
//! ## Concurrency
//!
//! Every check is a synchronous, read-only computation. The only shared
//! state is the process-wide registry: [`set_defaults`] and
//! [`reset_defaults`] build the next registry completely before publishing
//! it, so concurrent readers see either the old or the new configuration,
//! never a partially merged one.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod detect;
pub mod expiry;
pub mod field;
pub mod luhn;
pub mod matches;
pub mod sanitize;
pub mod validate;

// Re-export the API surface at the crate root.
pub use config::{
    get_defaults, reset_defaults, set_defaults, CardType, CardTypeOverride, CardTypeOverrides,
    Config, ConfigOverrides, ExpiryRange, FieldSchema, Pattern, PatternError,
};
pub use detect::{detect_card_type, detect_card_type_with};
pub use expiry::{
    is_expired, is_valid_expiry_month, is_valid_expiry_month_with, is_valid_expiry_year,
    is_valid_expiry_year_with,
};
pub use field::FieldValue;
pub use luhn::validate as luhn_valid;
pub use matches::{
    cvv_matches_type, cvv_matches_type_with, is_valid_card_number, is_valid_card_number_with,
    number_matches_type, number_matches_type_with,
};
pub use sanitize::sanitize_digits;
pub use validate::{validate, validate_with, CustomValidation, ValidationOptions, ValidationReport};
