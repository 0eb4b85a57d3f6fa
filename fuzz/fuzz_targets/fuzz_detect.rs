//! Fuzz target for card type detection.
//!
//! Tests that detection never panics and only reports canonical names.

#![no_main]

use credit_card::{detect_card_type_with, Config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let config = Config::built_in();

    for allow_partial in [false, true] {
        if let Some(name) = detect_card_type_with(&config, data, allow_partial) {
            assert!(config.card_type(name).is_some());
        }
    }
});
