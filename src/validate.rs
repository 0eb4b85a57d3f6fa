//! The validation orchestrator: resolves card fields, runs every field
//! check, and aggregates the verdicts into one report.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::config::{self, Config, ConfigOverrides};
use crate::expiry;
use crate::field::{self, FieldValue};
use crate::matches;
use crate::sanitize::sanitize_digits;

/// A caller-supplied validation step. It receives the untouched input record
/// and the merged registry in effect for the call; its return value is
/// passed through the report verbatim. If it panics, the panic propagates to
/// the caller.
pub type CustomValidation = Box<dyn Fn(&Value, &Config) -> Value + Send + Sync>;

/// Per-call options for [`validate`] and [`detect_card_type`].
///
/// [`detect_card_type`]: crate::detect_card_type
#[derive(Default)]
pub struct ValidationOptions {
    /// Registry patch merged onto the live (or injected) registry for the
    /// duration of the call.
    pub overrides: ConfigOverrides,
    /// Enables prefix detection in [`detect_card_type`].
    ///
    /// [`detect_card_type`]: crate::detect_card_type
    pub allow_partial: bool,
    custom_validation: Option<CustomValidation>,
}

impl ValidationOptions {
    /// Options with no overrides, partial detection off, and no custom step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the registry patch.
    pub fn overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Enables or disables prefix detection.
    pub fn allow_partial(mut self, allow_partial: bool) -> Self {
        self.allow_partial = allow_partial;
        self
    }

    /// Installs a custom validation step.
    pub fn custom_validation<F>(mut self, step: F) -> Self
    where
        F: Fn(&Value, &Config) -> Value + Send + Sync + 'static,
    {
        self.custom_validation = Some(Box::new(step));
        self
    }

    /// The installed custom step, if any.
    pub fn custom(&self) -> Option<&(dyn Fn(&Value, &Config) -> Value + Send + Sync)> {
        self.custom_validation.as_deref()
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("overrides", &self.overrides)
            .field("allow_partial", &self.allow_partial)
            .field("custom_validation", &self.custom_validation.is_some())
            .finish()
    }
}

/// The outcome of one [`validate`] call.
///
/// The five verdicts are independent: each is always computed, and none
/// short-circuits another. Serializing the report produces the camelCase
/// field names hosts expect, with `customValidation` omitted when no custom
/// step was configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport<'a> {
    /// The input record, untouched.
    pub card: &'a Value,
    /// The number matched the named type's pattern and passed Luhn.
    pub valid_card_number: bool,
    /// The expiry month was well-shaped and in range.
    pub valid_expiry_month: bool,
    /// The expiry year was well-shaped and in range.
    pub valid_expiry_year: bool,
    /// The CVV matched the named type's CVV pattern.
    pub valid_cvv: bool,
    /// The card's expiry month has passed.
    pub is_expired: bool,
    /// Raw return value of the custom validation step, if one was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_validation: Option<Value>,
}

/// Validates a card record against the live registry.
///
/// Fields are pulled from the record through the configured schema (dotted
/// paths are tolerated; missing paths resolve to nothing), the number and
/// CVV are sanitized, and every field check runs. A null record fails every
/// field check and reports `is_expired` because the missing month and year
/// coerce to zero.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let card = json!({
///     "cardType": "VISA",
///     "number": "4111111111111111",
///     "expiryMonth": "03",
///     "expiryYear": "2100",
///     "cvv": "123",
/// });
/// let report = credit_card::validate(&card, None);
/// assert!(report.valid_card_number);
/// assert!(report.valid_cvv);
/// assert!(!report.is_expired);
/// assert!(report.custom_validation.is_none());
/// ```
pub fn validate<'a>(record: &'a Value, options: Option<&ValidationOptions>) -> ValidationReport<'a> {
    validate_with(&config::get_defaults(), record, options)
}

/// [`validate`] against an explicit registry. Per-call overrides still merge
/// on top of it.
pub fn validate_with<'a>(
    config: &Config,
    record: &'a Value,
    options: Option<&ValidationOptions>,
) -> ValidationReport<'a> {
    let merged;
    let settings = match options {
        Some(opts) if !opts.overrides.is_empty() => {
            merged = config.merged(&opts.overrides);
            &merged
        }
        _ => config,
    };

    let schema = settings.schema();
    let lookup = |path: &Option<String>| path.as_deref().and_then(|p| field::resolve(record, p));

    let type_name = lookup(&schema.card_type)
        .and_then(Value::as_str)
        .unwrap_or("");
    let number = Zeroizing::new(sanitize_digits(FieldValue::from_json(lookup(&schema.number))));
    let cvv = Zeroizing::new(sanitize_digits(FieldValue::from_json(lookup(&schema.cvv))));
    let month = FieldValue::from_json(lookup(&schema.expiry_month));
    let year = FieldValue::from_json(lookup(&schema.expiry_year));

    let custom_validation = options
        .and_then(ValidationOptions::custom)
        .map(|step| step(record, settings));

    ValidationReport {
        card: record,
        valid_card_number: matches::is_valid_card_number_with(settings, &number, type_name),
        valid_expiry_month: expiry::is_valid_expiry_month_with(settings, month),
        valid_expiry_year: expiry::is_valid_expiry_year_with(settings, year),
        valid_cvv: matches::cvv_matches_type_with(settings, &cvv, type_name),
        is_expired: expiry::is_expired(month, year),
        custom_validation,
    }
}
