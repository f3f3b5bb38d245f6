//! Metadata values attached to links and network elements

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata mapping, ordered by key for deterministic iteration
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A metadata value: either numeric or categorical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Number(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Short name of the value's tag, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for MetadataValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for MetadataValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl TryFrom<serde_json::Value> for MetadataValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| format!("number {} is not representable", n)),
            serde_json::Value::String(s) => Ok(Self::Text(s)),
            other => Err(format!("expected number or string, got {}", other)),
        }
    }
}

/// Parse a command-line style value: numbers become numeric, anything else text.
///
/// Quoting the value (`"50"`) forces a categorical string.
pub fn parse_value(raw: &str) -> MetadataValue {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return MetadataValue::Text(trimmed[1..trimmed.len() - 1].to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => MetadataValue::Number(n),
        _ => MetadataValue::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_deserialization() {
        let meta: Metadata =
            serde_json::from_str(r#"{"bandwidth": 50, "ownership": "red"}"#).unwrap();
        assert_eq!(meta["bandwidth"], MetadataValue::Number(50.0));
        assert_eq!(meta["ownership"], MetadataValue::Text("red".into()));
    }

    #[test]
    fn test_try_from_json_rejects_bool() {
        assert!(MetadataValue::try_from(serde_json::json!(true)).is_err());
        assert_eq!(
            MetadataValue::try_from(serde_json::json!(1.5)),
            Ok(MetadataValue::Number(1.5))
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("50"), MetadataValue::Number(50.0));
        assert_eq!(parse_value("blue"), MetadataValue::Text("blue".into()));
        assert_eq!(parse_value("\"50\""), MetadataValue::Text("50".into()));
        assert_eq!(parse_value("NaN"), MetadataValue::Text("NaN".into()));
    }
}
