//! Fuzz target for digit sanitization.

#![no_main]

use credit_card::sanitize_digits;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let sanitized = sanitize_digits(data);

    // Output is digits only, and sanitizing is idempotent.
    assert!(sanitized.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(sanitize_digits(sanitized.as_str()), sanitized);
});
