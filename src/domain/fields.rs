//! Typed field extraction from untyped input records.
//!
//! Single predictions arrive as JSON objects (numbers are real numbers);
//! batch rows arrive from CSV (every cell is a string). The helpers here
//! accept both representations so the engine and the batch processor share
//! one coercion contract.

use serde_json::Value;

use crate::domain::Record;
use crate::error::{ModelError, Result};

/// Coerce a JSON value to f64: numbers directly, strings by parsing.
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn require_f64(record: &Record, field: &str) -> Result<f64> {
    let value = record
        .get(field)
        .ok_or_else(|| ModelError::MissingField { field: field.to_string() })?;
    as_f64(value).ok_or_else(|| ModelError::InvalidField {
        field: field.to_string(),
        expected: "number",
    })
}

pub fn require_str(record: &Record, field: &str) -> Result<String> {
    let value = record
        .get(field)
        .ok_or_else(|| ModelError::MissingField { field: field.to_string() })?;
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        // Tolerate non-string scalars the way a dataframe cast would.
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ModelError::InvalidField {
            field: field.to_string(),
            expected: "string",
        }),
    }
}

/// Optional numeric field with a default; present-but-malformed is an error.
pub fn optional_f64(record: &Record, field: &str, default: f64) -> Result<f64> {
    match record.get(field) {
        None => Ok(default),
        Some(Value::Null) => Ok(default),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(default),
        Some(value) => as_f64(value).ok_or_else(|| ModelError::InvalidField {
            field: field.to_string(),
            expected: "number",
        }),
    }
}

pub fn optional_str(record: &Record, field: &str, default: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Optional boolean with a default; unparseable values fall back to the
/// default rather than erroring (matches the reference's permissive reads).
pub fn optional_bool(record: &Record, field: &str, default: bool) -> bool {
    record.get(field).and_then(as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn numbers_parse_from_json_and_csv_shapes() {
        let rec = record(&[("a", json!(2.5)), ("b", json!("3.75")), ("c", json!(" 4 "))]);
        assert_eq!(require_f64(&rec, "a").unwrap(), 2.5);
        assert_eq!(require_f64(&rec, "b").unwrap(), 3.75);
        assert_eq!(require_f64(&rec, "c").unwrap(), 4.0);
    }

    #[test]
    fn malformed_number_is_an_invalid_field() {
        let rec = record(&[("weight", json!("heavy"))]);
        let err = require_f64(&rec, "weight").unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { .. }));
    }

    #[test]
    fn missing_field_is_distinct_from_invalid() {
        let rec = record(&[]);
        let err = require_f64(&rec, "weight").unwrap_err();
        assert!(matches!(err, ModelError::MissingField { .. }));
    }

    #[test]
    fn optional_fields_use_defaults_for_absent_or_blank() {
        let rec = record(&[("x", json!(""))]);
        assert_eq!(optional_f64(&rec, "x", 7.0).unwrap(), 7.0);
        assert_eq!(optional_f64(&rec, "y", 7.0).unwrap(), 7.0);
        assert_eq!(optional_str(&rec, "z", "electronics"), "electronics");
        assert!(optional_bool(&rec, "w", true));
    }

    #[test]
    fn booleans_accept_common_csv_spellings() {
        let rec = record(&[("a", json!("TRUE")), ("b", json!("0")), ("c", json!(1))]);
        assert!(optional_bool(&rec, "a", false));
        assert!(!optional_bool(&rec, "b", true));
        assert!(optional_bool(&rec, "c", false));
    }
}
