//! Field extraction from card records and loose value coercion.
//!
//! Input records are [`serde_json::Value`] objects shaped however the host
//! likes; the configured field schema names a path for each logical field.
//! A resolved value is viewed through [`FieldValue`], which mirrors the
//! loosely typed inputs the validators accept: text, numbers, booleans, or
//! nothing at all.

use serde_json::Value;

/// A loosely typed view of one card field.
///
/// Everything that is not text or a scalar number still has defined
/// behavior: it sanitizes to an empty string and coerces to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The field is missing or null.
    Absent,
    /// A text value.
    Text(&'a str),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// An array, object, or other non-scalar value.
    Other,
}

impl<'a> FieldValue<'a> {
    /// Views an optional resolved record value.
    pub fn from_json(value: Option<&'a Value>) -> Self {
        value.map(Self::from).unwrap_or(Self::Absent)
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces to an integer the way the validators expect: numeric text
    /// parses (fractions truncate toward zero), booleans map to 0/1, and
    /// everything else, including non-numeric text, coerces to 0.
    pub fn to_int(&self) -> i64 {
        match self {
            Self::Int(n) => *n,
            Self::Float(f) => *f as i64,
            Self::Bool(b) => i64::from(*b),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return 0;
                }
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(0)
            }
            Self::Absent | Self::Other => 0,
        }
    }
}

impl<'a> From<&'a Value> for FieldValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(s) => Self::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Other),
            },
            Value::Bool(b) => Self::Bool(*b),
            Value::Array(_) | Value::Object(_) => Self::Other,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Resolves a dotted path inside a record. Path segments index into objects
/// by key and into arrays by position; any missing step yields `None`.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}
