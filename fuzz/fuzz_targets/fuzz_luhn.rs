//! Fuzz target for the Luhn checksum.
//!
//! Tests that luhn::validate never panics on arbitrary input.

#![no_main]

use credit_card::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must never panic, whatever the input looks like.
    let _ = luhn::validate(data);

    // A sanitized version must not panic either.
    let digits = credit_card::sanitize_digits(data);
    let _ = luhn::validate(&digits);
});
