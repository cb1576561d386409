//! Command parameter bag

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single parameter value
///
/// The wire format only promises numbers and strings. Anything else (booleans,
/// null, nested objects) is kept as `Other` so that a badly typed parameter
/// surfaces as an execution error for the command that reads it rather than
/// rejecting the whole frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ParamValue {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Number(_) => "number",
            ParamValue::Text(_) => "string",
            ParamValue::Other(serde_json::Value::Bool(_)) => "boolean",
            ParamValue::Other(serde_json::Value::Null) => "null",
            ParamValue::Other(serde_json::Value::Array(_)) => "array",
            ParamValue::Other(_) => "object",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Parameters attached to a request, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract a required numeric parameter
    pub fn number(&self, key: &str) -> Result<f64> {
        match self.get(key) {
            Some(ParamValue::Number(n)) => Ok(*n),
            Some(_) => Err(BridgeError::ParamType {
                key: key.to_string(),
                expected: "number",
            }),
            None => Err(BridgeError::MissingParam(key.to_string())),
        }
    }

    /// Extract a required string parameter
    pub fn text(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(ParamValue::Text(s)) => Ok(s),
            Some(_) => Err(BridgeError::ParamType {
                key: key.to_string(),
                expected: "string",
            }),
            None => Err(BridgeError::MissingParam(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_values_decode_to_their_variants() {
        let json = r#"{"distance": 5, "scale": 0.5, "message": "hi", "flag": true}"#;
        let params: Params = serde_json::from_str(json).unwrap();

        assert_eq!(params.get("distance"), Some(&ParamValue::Number(5.0)));
        assert_eq!(params.get("scale"), Some(&ParamValue::Number(0.5)));
        assert_eq!(params.get("message"), Some(&ParamValue::Text("hi".into())));
        assert_eq!(params.get("flag").map(ParamValue::type_name), Some("boolean"));
    }

    #[test]
    fn test_number_extraction() {
        let params = Params::new().with("distance", 3).with("name", "Steve");

        assert_eq!(params.number("distance").unwrap(), 3.0);
        match params.number("name") {
            Err(BridgeError::ParamType { key, expected }) => {
                assert_eq!(key, "name");
                assert_eq!(expected, "number");
            }
            other => panic!("Expected ParamType error, got {:?}", other),
        }
        assert!(matches!(
            params.number("missing"),
            Err(BridgeError::MissingParam(_))
        ));
    }

    #[test]
    fn test_text_extraction() {
        let params = Params::new().with("message", "hello").with("degrees", 90.0);

        assert_eq!(params.text("message").unwrap(), "hello");
        let err = params.text("degrees").unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'degrees' must be a string");
    }

    #[test]
    fn test_serializes_flat() {
        let params = Params::new().with("degrees", 15.0);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"degrees":15.0}"#);
    }
}
