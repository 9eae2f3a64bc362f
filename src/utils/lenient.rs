//! Lenient numeric coercion for loosely-typed request fields.
//!
//! Every request field is optional. A value that cannot be read as a finite
//! number is treated exactly like a missing one, so the caller's declared
//! default applies instead of an error.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Reads a JSON value as a finite `f64`.
///
/// Numbers are taken as-is, numeric strings are parsed and booleans map to
/// 1/0. Everything else, including NaN and infinities, yields `None`.
pub fn coerce_f64(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Reads a JSON array as a list of finite numbers, dropping elements that do
/// not coerce. An empty result counts as absent.
pub fn coerce_f64_list(value: &JsonValue) -> Option<Vec<f64>> {
    let values: Vec<f64> = value.as_array()?.iter().filter_map(coerce_f64).collect();
    (!values.is_empty()).then_some(values)
}

/// `deserialize_with` adapter for optional numeric fields.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

/// `deserialize_with` adapter for 0/1 indicator fields: any non-zero number is 1.
pub fn indicator<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(coerce_f64(&value).map(|v| if v != 0.0 { 1.0 } else { 0.0 }))
}

/// `deserialize_with` adapter for numeric list fields.
pub fn number_list<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(coerce_f64_list(&value))
}
