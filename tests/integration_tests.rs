//! Integration tests for the full validation surface, including the
//! process-wide registry lifecycle.
//!
//! Rust runs tests in one process, so every test that reads or writes the
//! live registry serializes through `REGISTRY_LOCK` and leaves the registry
//! reset. Tests that inject an explicit `Config` need no locking.

use std::sync::{Mutex, MutexGuard, PoisonError};

use credit_card::{
    detect_card_type, get_defaults, is_expired, is_valid_card_number, is_valid_expiry_month,
    is_valid_expiry_year, luhn_valid, number_matches_type, reset_defaults, sanitize_digits,
    set_defaults, validate, validate_with, CardTypeOverride, CardTypeOverrides, Config,
    ConfigOverrides, ExpiryRange, FieldSchema, FieldValue, Pattern, ValidationOptions,
};
use serde_json::{json, Value};

static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

/// Takes the registry lock and restores the built-in defaults.
fn registry_guard() -> MutexGuard<'static, ()> {
    let guard = REGISTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    reset_defaults();
    guard
}

fn visa_card() -> Value {
    json!({
        "cardType": "VISA",
        "number": "4111111111111111",
        "expiryMonth": "03",
        "expiryYear": "2100",
        "cvv": "123",
    })
}

// =============================================================================
// END-TO-END VALIDATION
// =============================================================================

#[test]
fn valid_card_has_no_invalid_responses() {
    let _guard = registry_guard();

    let card = visa_card();
    let report = validate(&card, None);

    assert_eq!(report.card, &card);
    assert!(report.valid_card_number);
    assert!(report.valid_expiry_month);
    assert!(report.valid_expiry_year);
    assert!(report.valid_cvv);
    assert!(!report.is_expired);
    assert!(report.custom_validation.is_none());
}

#[test]
fn absent_record_fails_every_check_and_reports_expired() {
    let _guard = registry_guard();

    let record = Value::Null;
    let report = validate(&record, None);

    assert!(!report.valid_card_number);
    assert!(!report.valid_expiry_month);
    assert!(!report.valid_expiry_year);
    assert!(!report.valid_cvv);
    assert!(report.is_expired);
    assert!(report.custom_validation.is_none());
}

#[test]
fn alias_and_canonical_names_validate_identically() {
    let _guard = registry_guard();

    let by_name = visa_card();
    let mut by_alias = visa_card();
    by_alias["cardType"] = json!("VC");

    let canonical = validate(&by_name, None);
    let aliased = validate(&by_alias, None);

    assert_eq!(canonical.valid_card_number, aliased.valid_card_number);
    assert_eq!(canonical.valid_cvv, aliased.valid_cvv);
    assert!(aliased.valid_card_number);
    assert!(aliased.valid_cvv);
}

#[test]
fn custom_validation_step_runs_with_record_and_merged_settings() {
    let _guard = registry_guard();

    let mut card = visa_card();
    card["pin"] = json!("7890");

    let options = ValidationOptions::new().custom_validation(|record, settings| {
        // The merged settings are the full registry for this call.
        assert!(settings.card_type("VISA").is_some());
        json!(record["pin"] == json!("7890"))
    });
    let report = validate(&card, Some(&options));

    assert!(report.valid_card_number);
    assert_eq!(report.custom_validation, Some(json!(true)));
}

#[test]
fn per_call_card_type_definition() {
    let _guard = registry_guard();

    let gift_card = json!({
        "cardType": "GIFT_CARD",
        "number": "4111111111111111",
        "expiryMonth": "03",
        "expiryYear": "2100",
        "pin": "7890",
    });
    let options = ValidationOptions::new()
        .overrides(ConfigOverrides::new().card_type(
            "GIFT_CARD",
            CardTypeOverride::new()
                .number_pattern(Pattern::new(r"^4[0-9]{12}(?:[0-9]{3})?$").unwrap())
                .cvv_pattern(Pattern::new(r".*").unwrap()),
        ))
        .custom_validation(|record, _| {
            if record["cardType"] == json!("GIFT_CARD") {
                json!(record["pin"] == json!("7890"))
            } else {
                Value::Null
            }
        });

    let report = validate(&gift_card, Some(&options));
    assert!(report.valid_card_number);
    assert!(report.valid_expiry_month);
    assert!(report.valid_expiry_year);
    assert!(report.valid_cvv);
    assert!(!report.is_expired);
    assert_eq!(report.custom_validation, Some(json!(true)));

    // The live registry never learned about GIFT_CARD.
    assert!(get_defaults().card_type("GIFT_CARD").is_none());

    // Existing validation still works under the same options.
    let visa = visa_card();
    let report = validate(&visa, Some(&options));
    assert!(report.valid_card_number);
    assert!(report.valid_cvv);
}

// =============================================================================
// DETECTION
// =============================================================================

#[test]
fn detection_through_the_live_registry() {
    let _guard = registry_guard();

    assert_eq!(
        detect_card_type("4111111111111111", None).as_deref(),
        Some("VISA")
    );
    assert_eq!(detect_card_type("0000000000000000", None), None);

    let partial = ValidationOptions::new().allow_partial(true);
    assert_eq!(detect_card_type("4", Some(&partial)).as_deref(), Some("VISA"));
    assert_eq!(
        detect_card_type("4", Some(&ValidationOptions::new().allow_partial(false))),
        None
    );
    assert_eq!(detect_card_type("5555555", None), None);
}

#[test]
fn detection_reports_canonical_names_for_custom_aliases() {
    let _guard = registry_guard();

    set_defaults(&ConfigOverrides::new().alias("Visa", "VISA"), false);
    // Detection iterates canonical types only; the new alias changes lookup,
    // not detection output.
    assert_eq!(
        detect_card_type("4111111111111111", None).as_deref(),
        Some("VISA")
    );
    assert_eq!(get_defaults().card_type("Visa").unwrap().name(), "VISA");

    reset_defaults();
}

// =============================================================================
// FIELD PREDICATES THROUGH THE LIVE REGISTRY
// =============================================================================

#[test]
fn match_predicates_accept_custom_type_overrides() {
    let _guard = registry_guard();

    let mut card_types = CardTypeOverrides::new();
    card_types.set(
        "foo",
        CardTypeOverride::new()
            .number_pattern(Pattern::new(r"^91*$").unwrap())
            .cvv_pattern(Pattern::new(r".*").unwrap()),
    );

    assert!(number_matches_type("911", "foo", Some(&card_types)));
    assert!(!number_matches_type("811", "foo", Some(&card_types)));
    assert!(!number_matches_type("911", "foo", None));
}

#[test]
fn card_number_validity_requires_checksum() {
    let _guard = registry_guard();

    assert!(is_valid_card_number("4111111111111111", "VISA", None));
    assert!(is_valid_card_number("4111-1111-1111-1111", "vc", None));
    assert!(!is_valid_card_number("4111111111111112", "VISA", None));
    assert!(!is_valid_card_number("123", "AMERICANEXPRESS", None));
}

#[test]
fn expiry_predicates_through_the_live_registry() {
    let _guard = registry_guard();

    assert!(is_valid_expiry_month("01", None));
    assert!(!is_valid_expiry_month("001", None));
    assert!(!is_valid_expiry_month(13, None));
    assert!(is_valid_expiry_month(13, Some(&ExpiryRange::new(13, 13))));

    assert!(is_valid_expiry_year("1990", None));
    assert!(!is_valid_expiry_year("100", None));
    assert!(!is_valid_expiry_year(1899, None));
    assert!(is_valid_expiry_year(1900, None));
}

// =============================================================================
// DEFAULTS LIFECYCLE
// =============================================================================

#[test]
fn merging_defaults_adds_without_removing() {
    let _guard = registry_guard();

    let original = reset_defaults();
    let updated = set_defaults(
        &ConfigOverrides::new().card_type(
            "LOYALTY",
            CardTypeOverride::new()
                .number_pattern(Pattern::new(r"^9[0-9]{15}$").unwrap())
                .cvv_pattern(Pattern::new(r"^\d{3}$").unwrap()),
        ),
        false,
    );

    assert!(original.card_type("LOYALTY").is_none());
    assert!(updated.card_type("LOYALTY").is_some());
    assert!(updated.card_type("VISA").is_some());
    assert_eq!(
        detect_card_type("9000000000000000", None).as_deref(),
        Some("LOYALTY")
    );

    reset_defaults();
}

#[test]
fn merging_an_empty_patch_changes_nothing() {
    let _guard = registry_guard();

    let original = reset_defaults();
    let updated = set_defaults(&ConfigOverrides::new(), false);
    assert_eq!(original, updated);
    assert_eq!(get_defaults(), original);
}

#[test]
fn overwrite_discards_everything_not_supplied() {
    let _guard = registry_guard();

    let emptied = set_defaults(&ConfigOverrides::new(), true);
    assert_eq!(emptied, Config::empty());
    assert_eq!(get_defaults().card_types().count(), 0);

    // Degraded validators: no types, no ranges, no schema.
    assert!(!is_valid_card_number("4111111111111111", "VISA", None));
    assert!(!is_valid_expiry_month(6, None));
    assert!(!is_valid_expiry_year(2100, None));
    let card = visa_card();
    let report = validate(&card, None);
    assert!(!report.valid_card_number);
    assert!(!report.valid_expiry_month);
    assert!(!report.valid_expiry_year);
    assert!(!report.valid_cvv);
    assert!(report.is_expired);

    reset_defaults();
}

#[test]
fn reset_is_idempotent() {
    let _guard = registry_guard();

    let first = reset_defaults();
    let second = reset_defaults();
    assert_eq!(first, second);
    assert!(first.card_type("VISA").is_some());
    assert!(first.card_type("vc").is_some());
    assert!(first.expiry_months().is_some());
    assert!(first.expiry_years().is_some());
}

#[test]
fn configuration_changes_never_leak_into_the_restored_snapshot() {
    let _guard = registry_guard();

    let before = reset_defaults();

    set_defaults(
        &ConfigOverrides::new()
            .card_type(
                "VISA",
                CardTypeOverride::new().cvv_pattern(Pattern::new(r"^\d{9}$").unwrap()),
            )
            .expiry_months(ExpiryRange::new(13, 13)),
        false,
    );
    set_defaults(&ConfigOverrides::new(), true);

    let after = reset_defaults();
    assert_eq!(before, after);
    assert!(after
        .card_type("VISA")
        .unwrap()
        .cvv_pattern()
        .unwrap()
        .matches("123"));
}

#[test]
fn default_schema_can_be_replaced_process_wide() {
    let _guard = registry_guard();

    set_defaults(
        &ConfigOverrides::new().schema(FieldSchema {
            card_type: Some("type".to_owned()),
            number: Some("number".to_owned()),
            expiry_month: Some("expire_month".to_owned()),
            expiry_year: Some("expire_year".to_owned()),
            cvv: Some("cvv2".to_owned()),
        }),
        false,
    );

    let card = json!({
        "type": "visa",
        "number": "4111111111111111",
        "expire_month": "03",
        "expire_year": "2100",
        "cvv2": "123",
    });
    let report = validate(&card, None);
    assert!(report.valid_card_number);
    assert!(report.valid_expiry_month);
    assert!(report.valid_expiry_year);
    assert!(report.valid_cvv);
    assert!(!report.is_expired);

    reset_defaults();
}

// =============================================================================
// REGISTRY-FREE SURFACES
// =============================================================================

#[test]
fn sanitize_and_luhn_follow_their_contracts() {
    assert_eq!(sanitize_digits("4111-1111-1111-1111"), "4111111111111111");
    assert_eq!(sanitize_digits(FieldValue::Absent), "");
    assert_eq!(sanitize_digits(false), "");
    assert_eq!(
        sanitize_digits(FieldValue::from_json(Some(&json!({})))),
        ""
    );

    assert!(luhn_valid("4111111111111111"));
    assert!(!luhn_valid("4111111111111112"));
    assert!(!luhn_valid(""));
    assert!(!luhn_valid("abc"));
}

#[test]
fn expiration_is_inclusive_of_the_expiry_month() {
    use chrono::{Datelike, Utc};

    let now = Utc::now();
    // Not expired during the expiry month.
    assert!(!is_expired(now.month() as i64, i64::from(now.year())));
    // Expired the month after.
    let (last_month, year) = if now.month() == 1 {
        (12i64, i64::from(now.year()) - 1)
    } else {
        (i64::from(now.month()) - 1, i64::from(now.year()))
    };
    assert!(is_expired(last_month, year));
    assert!(is_expired(12, 2013));
    assert!(!is_expired(1, 2100));
}

#[test]
fn injected_registries_are_isolated_from_the_live_one() {
    // No lock needed: nothing here touches the process-wide registry.
    let card = visa_card();

    let config = Config::built_in();
    let report = validate_with(&config, &card, None);
    assert!(report.valid_card_number);

    let stripped = Config::empty();
    let report = validate_with(&stripped, &card, None);
    assert!(!report.valid_card_number);
    assert!(report.is_expired);
}
