//! Request types flowing through the pipeline: raw tool request, validated
//! parameters and the immutable endpoint request handed to the transport.

use super::schema::{EndpointClass, HttpMethod, ToolSpec};
use serde_json::Value;
use std::fmt;

/// A raw tool invocation as received from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub tool_name: String,
    /// JSON object of loosely typed arguments; `Null` means no arguments.
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// A coerced, validated argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    Integer(u64),
    Bool(bool),
    List(Vec<String>),
    /// Compact JSON text of a filter expression.
    Filter(String),
}

impl ParamValue {
    /// Query-string representation.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Text(s) | Self::Filter(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::List(items) => items.join(","),
        }
    }

    /// JSON representation used inside package `data` objects.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Integer(n) => Value::from(*n),
            Self::Bool(b) => Value::Bool(*b),
            Self::List(items) => Value::from(items.clone()),
            Self::Filter(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }
}

/// Output of the validator: the tool and its fields in descriptor order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParameters {
    pub tool: &'static ToolSpec,
    pub fields: Vec<(&'static str, ParamValue)>,
}

impl ValidatedParameters {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Fully built HTTP request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    pub method: HttpMethod,
    pub path: &'static str,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    pub class: EndpointClass,
    pub token: BearerToken,
}

impl EndpointRequest {
    /// Query string in emission order, percent-encoded.
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_value_query_forms() {
        assert_eq!(ParamValue::Number(19.7167).to_query_string(), "19.7167");
        assert_eq!(ParamValue::Number(-155.0).to_query_string(), "-155");
        assert_eq!(ParamValue::Bool(true).to_query_string(), "true");
        assert_eq!(
            ParamValue::List(vec!["0115".into(), "0116".into()]).to_query_string(),
            "0115,0116"
        );
    }

    #[test]
    fn test_filter_to_json_is_structured() {
        let filter = ParamValue::Filter(r#"{"name":"hcdp_station_value"}"#.into());
        assert_eq!(filter.to_json(), json!({"name": "hcdp_station_value"}));
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let token = BearerToken::new("secret-token");
        assert!(!format!("{:?}", token).contains("secret"));
        assert_eq!(token.expose(), "secret-token");
    }
}
