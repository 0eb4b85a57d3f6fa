//! The card validation registry: card-type definitions, aliases, expiry
//! ranges, and the field schema, plus the process-wide defaults lifecycle.
//!
//! A [`Config`] is an ordinary owned value. Every validation entry point has
//! a `*_with` variant that takes `&Config`, so hosts can build and inject
//! their own registry. For parity with simpler hosts, the crate also keeps a
//! process-wide live registry, managed through [`get_defaults`],
//! [`set_defaults`], and [`reset_defaults`].
//!
//! # Override semantics
//!
//! [`ConfigOverrides`] is a deep-merge patch with per-field rules:
//!
//! - `card_types` merges key-by-key. A key naming an existing type (directly
//!   or through an alias) patches that definition; each supplied pattern
//!   replaces that leaf and leaves sibling patterns untouched. An unknown key
//!   appends a new type after the existing ones.
//! - `aliases` entries are inserted into the alias table.
//! - `expiry_months`/`expiry_years` replace the whole range, never one bound.
//! - `schema` merges field-by-field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;

/// A compiled card pattern.
///
/// Wraps [`regex::Regex`] with equality and `Debug` based on the source
/// pattern, so configurations can be compared in tests.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern. Anchor patterns explicitly (`^...$`) when they
    /// must cover the whole sanitized value.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        match Regex::new(pattern) {
            Ok(regex) => Ok(Self { regex }),
            Err(source) => Err(PatternError {
                pattern: pattern.to_owned(),
                source,
            }),
        }
    }

    /// Tests the pattern against an input string.
    #[inline]
    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Returns the source pattern string.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

/// Error returned when a caller-supplied pattern string fails to compile.
#[derive(Debug, Clone)]
pub struct PatternError {
    pattern: String,
    source: regex::Error,
}

impl PatternError {
    /// The pattern string that failed to compile.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid card pattern '{}': {}", self.pattern, self.source)
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// One canonical card-type definition.
///
/// An absent pattern never matches: a custom type defined without a partial
/// pattern is simply invisible to partial detection.
#[derive(Debug, Clone, PartialEq)]
pub struct CardType {
    name: String,
    number_pattern: Option<Pattern>,
    partial_pattern: Option<Pattern>,
    cvv_pattern: Option<Pattern>,
}

impl CardType {
    /// Creates a definition with the two required patterns. Use
    /// [`CardType::with_partial_pattern`] to add prefix detection.
    pub fn new(name: impl Into<String>, number_pattern: Pattern, cvv_pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            number_pattern: Some(number_pattern),
            partial_pattern: None,
            cvv_pattern: Some(cvv_pattern),
        }
    }

    /// Adds a prefix pattern for partial detection.
    pub fn with_partial_pattern(mut self, pattern: Pattern) -> Self {
        self.partial_pattern = Some(pattern);
        self
    }

    /// The canonical type name, e.g. `"VISA"`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pattern matching a complete sanitized number.
    #[inline]
    pub fn number_pattern(&self) -> Option<&Pattern> {
        self.number_pattern.as_ref()
    }

    /// Pattern matching a sanitized number prefix.
    #[inline]
    pub fn partial_pattern(&self) -> Option<&Pattern> {
        self.partial_pattern.as_ref()
    }

    /// Pattern matching a sanitized CVV.
    #[inline]
    pub fn cvv_pattern(&self) -> Option<&Pattern> {
        self.cvv_pattern.as_ref()
    }
}

/// Inclusive bounds for an expiry month or year check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryRange {
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
}

impl ExpiryRange {
    /// Creates a range with inclusive bounds.
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` falls within the bounds.
    #[inline]
    pub const fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Maps each logical card field to the path used to pull it out of an input
/// record. Paths may be dotted (`"payment.card.number"`). A `None` path means
/// the field never resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    /// Path of the card-type name.
    pub card_type: Option<String>,
    /// Path of the card number.
    pub number: Option<String>,
    /// Path of the expiry month.
    pub expiry_month: Option<String>,
    /// Path of the expiry year.
    pub expiry_year: Option<String>,
    /// Path of the CVV.
    pub cvv: Option<String>,
}

impl FieldSchema {
    /// The default schema: each logical field read from the same-named
    /// top-level property.
    pub fn identity() -> Self {
        Self {
            card_type: Some("cardType".to_owned()),
            number: Some("number".to_owned()),
            expiry_month: Some("expiryMonth".to_owned()),
            expiry_year: Some("expiryYear".to_owned()),
            cvv: Some("cvv".to_owned()),
        }
    }
}

/// A patch for one card type. Present patterns replace that leaf; absent
/// patterns leave the existing definition untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardTypeOverride {
    /// Replacement full-number pattern.
    pub number_pattern: Option<Pattern>,
    /// Replacement prefix pattern.
    pub partial_pattern: Option<Pattern>,
    /// Replacement CVV pattern.
    pub cvv_pattern: Option<Pattern>,
}

impl CardTypeOverride {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the full-number pattern.
    pub fn number_pattern(mut self, pattern: Pattern) -> Self {
        self.number_pattern = Some(pattern);
        self
    }

    /// Sets the prefix pattern.
    pub fn partial_pattern(mut self, pattern: Pattern) -> Self {
        self.partial_pattern = Some(pattern);
        self
    }

    /// Sets the CVV pattern.
    pub fn cvv_pattern(mut self, pattern: Pattern) -> Self {
        self.cvv_pattern = Some(pattern);
        self
    }
}

/// An ordered set of card-type patches, keyed by type name or alias.
///
/// Order matters: patches for unknown names append new types in the order
/// they were added here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardTypeOverrides {
    entries: Vec<(String, CardTypeOverride)>,
}

impl CardTypeOverrides {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or updates the patch for `name`. Supplied leaves of a repeated
    /// name overwrite the earlier entry's leaves.
    pub fn set(&mut self, name: impl Into<String>, patch: CardTypeOverride) {
        let name = name.into();
        match self.entries.iter().position(|(n, _)| *n == name) {
            Some(index) => {
                let existing = &mut self.entries[index].1;
                if patch.number_pattern.is_some() {
                    existing.number_pattern = patch.number_pattern;
                }
                if patch.partial_pattern.is_some() {
                    existing.partial_pattern = patch.partial_pattern;
                }
                if patch.cvv_pattern.is_some() {
                    existing.cvv_pattern = patch.cvv_pattern;
                }
            }
            None => self.entries.push((name, patch)),
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CardTypeOverride)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Returns true if no patches were added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A deep-merge patch applied onto a [`Config`]. See the module docs for the
/// per-field merge rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Card-type patches, merged key-by-key.
    pub card_types: CardTypeOverrides,
    /// Alias entries (`alias`, `canonical`) added to the alias table.
    pub aliases: Vec<(String, String)>,
    /// Replacement month range.
    pub expiry_months: Option<ExpiryRange>,
    /// Replacement year range.
    pub expiry_years: Option<ExpiryRange>,
    /// Field-schema patch, merged field-by-field.
    pub schema: Option<FieldSchema>,
}

impl ConfigOverrides {
    /// An empty patch; merging it is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card-type patch.
    pub fn card_type(mut self, name: impl Into<String>, patch: CardTypeOverride) -> Self {
        self.card_types.set(name, patch);
        self
    }

    /// Adds an alias for a canonical type name.
    pub fn alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), canonical.into()));
        self
    }

    /// Replaces the expiry-month range.
    pub fn expiry_months(mut self, range: ExpiryRange) -> Self {
        self.expiry_months = Some(range);
        self
    }

    /// Replaces the expiry-year range.
    pub fn expiry_years(mut self, range: ExpiryRange) -> Self {
        self.expiry_years = Some(range);
        self
    }

    /// Patches the field schema.
    pub fn schema(mut self, schema: FieldSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.card_types.is_empty()
            && self.aliases.is_empty()
            && self.expiry_months.is_none()
            && self.expiry_years.is_none()
            && self.schema.is_none()
    }
}

/// The validation registry: canonical card types in insertion order, the
/// alias table, expiry ranges, and the field schema.
///
/// Aliases are kept in their own table and resolved at lookup time, so every
/// alias observes the canonical definition without sharing mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    card_types: Vec<CardType>,
    aliases: BTreeMap<String, String>,
    expiry_months: Option<ExpiryRange>,
    expiry_years: Option<ExpiryRange>,
    schema: FieldSchema,
}

/// Compiles a built-in pattern literal.
fn builtin(pattern: &str) -> Pattern {
    Pattern::new(pattern).expect("built-in pattern is valid")
}

impl Config {
    /// The built-in registry: the six stock brands, their aliases, month
    /// range 1..=12, year range 1900..=2200, and the identity schema.
    ///
    /// MASTERCARD uses the extended BIN ranges (51-55 plus 2221-2720).
    pub fn built_in() -> Self {
        let mut config = Self {
            card_types: vec![
                CardType::new(
                    "VISA",
                    builtin(r"^4[0-9]{12}(?:[0-9]{3})?$"),
                    builtin(r"^\d{3}$"),
                )
                .with_partial_pattern(builtin(r"^4")),
                CardType::new(
                    "MASTERCARD",
                    builtin(
                        r"^(?:5[1-5][0-9]{2}|222[1-9]|22[3-9][0-9]|2[3-6][0-9]{2}|27[0-1][0-9]|2720)[0-9]{12}$",
                    ),
                    builtin(r"^\d{3}$"),
                )
                .with_partial_pattern(builtin(
                    r"^(?:5[1-5]|222[1-9]|22[3-9][0-9]|2[3-6][0-9]{2}|27[0-1][0-9]|2720)",
                )),
                CardType::new(
                    "AMERICANEXPRESS",
                    builtin(r"^3[47][0-9]{13}$"),
                    builtin(r"^\d{4}$"),
                )
                .with_partial_pattern(builtin(r"^3[47]")),
                CardType::new(
                    "DINERSCLUB",
                    builtin(r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$"),
                    builtin(r"^\d{3}$"),
                )
                .with_partial_pattern(builtin(r"^3(0[0-5]|[68])")),
                CardType::new(
                    "DISCOVER",
                    builtin(r"^6(?:011|5[0-9]{2})[0-9]{12}$"),
                    builtin(r"^\d{3}$"),
                )
                .with_partial_pattern(builtin(r"^6(011|5[0-9])")),
                CardType::new(
                    "JCB",
                    builtin(r"^(?:2131|1800|35\d{3})\d{11}$"),
                    builtin(r"^\d{3}$"),
                )
                .with_partial_pattern(builtin(r"^(2131|1800|35)")),
            ],
            aliases: BTreeMap::new(),
            expiry_months: Some(ExpiryRange::new(1, 12)),
            expiry_years: Some(ExpiryRange::new(1900, 2200)),
            schema: FieldSchema::identity(),
        };

        config.add_aliases("VISA", &["vc", "VC", "visa"]);
        config.add_aliases(
            "MASTERCARD",
            &["mc", "MC", "mastercard", "master card", "MASTER CARD"],
        );
        config.add_aliases(
            "AMERICANEXPRESS",
            &[
                "ae",
                "AE",
                "ax",
                "AX",
                "amex",
                "AMEX",
                "american express",
                "AMERICAN EXPRESS",
            ],
        );
        config.add_aliases("DINERSCLUB", &["dinersclub"]);
        config.add_aliases("DISCOVER", &["dc", "DC", "discover"]);
        config.add_aliases("JCB", &["jcb"]);

        config
    }

    /// A registry with no card types, no aliases, no expiry ranges, and a
    /// schema that resolves nothing. Every check against it fails.
    pub fn empty() -> Self {
        Self {
            card_types: Vec::new(),
            aliases: BTreeMap::new(),
            expiry_months: None,
            expiry_years: None,
            schema: FieldSchema::default(),
        }
    }

    /// Builds a registry from a patch alone, as overwrite-mode
    /// [`set_defaults`] does. Anything the patch does not supply is absent.
    pub fn from_overrides(overrides: &ConfigOverrides) -> Self {
        let mut config = Self::empty();
        config.apply(overrides);
        config
    }

    fn add_aliases(&mut self, canonical: &str, aliases: &[&str]) {
        for alias in aliases {
            self.aliases
                .insert((*alias).to_owned(), canonical.to_owned());
        }
    }

    /// Looks up a card type by canonical name or alias.
    pub fn card_type(&self, name: &str) -> Option<&CardType> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.card_types.iter().find(|t| t.name == canonical)
    }

    /// Iterates canonical card types in insertion order.
    pub fn card_types(&self) -> impl Iterator<Item = &CardType> {
        self.card_types.iter()
    }

    /// The alias table, alias to canonical name.
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// The expiry-month range, if one is configured.
    pub fn expiry_months(&self) -> Option<&ExpiryRange> {
        self.expiry_months.as_ref()
    }

    /// The expiry-year range, if one is configured.
    pub fn expiry_years(&self) -> Option<&ExpiryRange> {
        self.expiry_years.as_ref()
    }

    /// The field schema.
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Merges a patch into this registry in place.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        for (name, patch) in overrides.card_types.iter() {
            let canonical = self
                .aliases
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_owned());
            match self.card_types.iter().position(|t| t.name == canonical) {
                Some(index) => {
                    let existing = &mut self.card_types[index];
                    if let Some(pattern) = &patch.number_pattern {
                        existing.number_pattern = Some(pattern.clone());
                    }
                    if let Some(pattern) = &patch.partial_pattern {
                        existing.partial_pattern = Some(pattern.clone());
                    }
                    if let Some(pattern) = &patch.cvv_pattern {
                        existing.cvv_pattern = Some(pattern.clone());
                    }
                }
                None => self.card_types.push(CardType {
                    name: canonical,
                    number_pattern: patch.number_pattern.clone(),
                    partial_pattern: patch.partial_pattern.clone(),
                    cvv_pattern: patch.cvv_pattern.clone(),
                }),
            }
        }

        for (alias, canonical) in &overrides.aliases {
            self.aliases.insert(alias.clone(), canonical.clone());
        }

        if let Some(range) = overrides.expiry_months {
            self.expiry_months = Some(range);
        }
        if let Some(range) = overrides.expiry_years {
            self.expiry_years = Some(range);
        }

        if let Some(schema) = &overrides.schema {
            if let Some(path) = &schema.card_type {
                self.schema.card_type = Some(path.clone());
            }
            if let Some(path) = &schema.number {
                self.schema.number = Some(path.clone());
            }
            if let Some(path) = &schema.expiry_month {
                self.schema.expiry_month = Some(path.clone());
            }
            if let Some(path) = &schema.expiry_year {
                self.schema.expiry_year = Some(path.clone());
            }
            if let Some(path) = &schema.cvv {
                self.schema.cvv = Some(path.clone());
            }
        }
    }

    /// Returns a copy of this registry with a patch merged in.
    pub fn merged(&self, overrides: &ConfigOverrides) -> Self {
        let mut config = self.clone();
        config.apply(overrides);
        config
    }
}

/// The process-wide live registry.
static LIVE_DEFAULTS: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::built_in()));

/// Snapshot of the original defaults, taken with aliases already expanded.
/// Only [`reset_defaults`] reads it.
static ORIGINAL_DEFAULTS: Lazy<Config> = Lazy::new(Config::built_in);

/// Returns a copy of the live registry.
pub fn get_defaults() -> Config {
    LIVE_DEFAULTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Reconfigures the live registry and returns the result.
///
/// With `overwrite` false the patch deep-merges onto the current registry.
/// With `overwrite` true the registry is replaced by
/// [`Config::from_overrides`]: anything the patch omits, including the
/// built-in card types and expiry ranges, is gone afterwards, and the
/// affected validators fail until the data is supplied or the registry is
/// reset.
///
/// The next registry value is built completely before it is published, so
/// concurrent readers observe either the old or the new registry.
pub fn set_defaults(overrides: &ConfigOverrides, overwrite: bool) -> Config {
    let next = if overwrite {
        Config::from_overrides(overrides)
    } else {
        get_defaults().merged(overrides)
    };
    *LIVE_DEFAULTS
        .write()
        .unwrap_or_else(PoisonError::into_inner) = next.clone();
    next
}

/// Restores the live registry to the original defaults (aliases included)
/// and returns the restored value.
pub fn reset_defaults() -> Config {
    let restored = ORIGINAL_DEFAULTS.clone();
    *LIVE_DEFAULTS
        .write()
        .unwrap_or_else(PoisonError::into_inner) = restored.clone();
    restored
}
