//! Request DTOs for the cache API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::Value;

/// A scalar as it arrives in JSON: integer, float or string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<ScalarValue> for Value {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Int(number) => Value::Int(number),
            ScalarValue::Float(number) => Value::Float(number),
            ScalarValue::Text(text) => Value::Str(text),
        }
    }
}

/// Request body for POST /store
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to store under a fresh key
    pub value: ScalarValue,
}

/// How GET /get/:key decodes the stored bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Str,
    Int,
    Float,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    #[serde(rename = "as", default)]
    pub kind: ValueKind,
}

/// Query string for GET /page and GET /count
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub url: String,
}

impl PageQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("url cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_request_scalar_kinds() {
        let int: StoreRequest = serde_json::from_str(r#"{"value": 42}"#).unwrap();
        let float: StoreRequest = serde_json::from_str(r#"{"value": 2.5}"#).unwrap();
        let text: StoreRequest = serde_json::from_str(r#"{"value": "hello"}"#).unwrap();

        assert_eq!(int.value, ScalarValue::Int(42));
        assert_eq!(float.value, ScalarValue::Float(2.5));
        assert_eq!(text.value, ScalarValue::Text("hello".to_string()));
    }

    #[test]
    fn test_store_request_rejects_non_scalar() {
        assert!(serde_json::from_str::<StoreRequest>(r#"{"value": [1, 2]}"#).is_err());
        assert!(serde_json::from_str::<StoreRequest>(r#"{}"#).is_err());
    }

    #[test]
    fn test_get_query_kind() {
        let query: GetQuery = serde_json::from_str(r#"{"as": "int"}"#).unwrap();
        assert_eq!(query.kind, ValueKind::Int);

        let query: GetQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.kind, ValueKind::Str);
    }

    #[test]
    fn test_validate_empty_url() {
        let query = PageQuery {
            url: "  ".to_string(),
        };
        assert!(query.validate().is_some());

        let query = PageQuery {
            url: "http://example.com".to_string(),
        };
        assert!(query.validate().is_none());
    }
}
