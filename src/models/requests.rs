//! Request DTOs for the key-value server API
//!
//! Defines incoming request bodies and the key coercion rules shared by the
//! body and path parameters.

use serde::Deserialize;
use serde_json::Value;

/// Request body for the CREATE operation (POST /create)
///
/// # Fields
/// - `key`: integer, or a string holding an integer
/// - `value`: any JSON; non-strings are stored as their JSON text
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub key: Value,
    #[serde(default)]
    pub value: Value,
}

impl CreateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_null() || self.value.is_null() {
            return Some("Missing key or value".to_string());
        }
        if self.parse_key().is_none() {
            return Some("Invalid key (expected integer)".to_string());
        }
        None
    }

    /// Coerces the key to an i64.
    ///
    /// Integers pass through, strings must parse completely and floats are
    /// truncated toward zero. Floats outside the i64 range are rejected.
    pub fn parse_key(&self) -> Option<i64> {
        match &self.key {
            Value::Number(n) => n.as_i64().or_else(|| {
                if n.is_f64() {
                    n.as_f64().map(f64::trunc).filter(|t| in_key_range(*t)).map(|t| t as i64)
                } else {
                    None
                }
            }),
            Value::String(s) => parse_key_str(s),
            _ => None,
        }
    }

    /// Renders the value as stored text.
    pub fn value_string(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// True if a truncated float converts to i64 without saturating.
fn in_key_range(t: f64) -> bool {
    // i64::MIN as f64 is exactly -2^63; 2^63 itself is out of range
    t >= i64::MIN as f64 && t < -(i64::MIN as f64)
}

/// Parses a path or string key as an i64.
pub fn parse_key_str(raw: &str) -> Option<i64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}
