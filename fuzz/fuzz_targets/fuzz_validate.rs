//! Fuzz target for the validation orchestrator.
//!
//! Tests that validate_with never panics, whether the record is a flat
//! string-valued object or arbitrary parsed JSON.

#![no_main]

use credit_card::{validate_with, Config};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &str| {
    let config = Config::built_in();

    let record = json!({
        "cardType": data,
        "number": data,
        "expiryMonth": data,
        "expiryYear": data,
        "cvv": data,
    });
    let _ = validate_with(&config, &record, None);

    // Arbitrary JSON records must be tolerated too, nested or not.
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(data) {
        let _ = validate_with(&config, &value, None);
    }
});
