use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CodecError;
use crate::fields;
use crate::signature::TypeHint;
use crate::types::{ProtocolVersion, RequestId};

/// Parameters for a JSON-RPC request: either an ordered sequence or a
/// name-to-value mapping. A scalar or null `params` node never makes it
/// into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(Map<String, Value>),
}

impl RequestParams {
    /// Get a parameter by name (for object params)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None,
        }
    }

    /// Get a parameter by index (for array params)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(items) => items.get(index),
            RequestParams::Object(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RequestParams::Array(items) => items.len(),
            RequestParams::Object(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Array(items) => Value::Array(items.clone()),
            RequestParams::Object(map) => Value::Object(map.clone()),
        }
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(items: Vec<Value>) -> Self {
        RequestParams::Array(items)
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

/// A JSON-RPC request.
///
/// Constructed once by the sender and immutable afterwards. A request
/// without an id is a notification: the protocol mandates that no reply is
/// delivered for it, though the executor still computes a response.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub version: ProtocolVersion,
    pub method: String,
    pub params: Option<RequestParams>,
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Option<RequestParams>, id: RequestId) -> Self {
        Self {
            version: ProtocolVersion::V2_0,
            method: method.into(),
            params,
            id: Some(id),
        }
    }

    /// Create a request without an id.
    pub fn notification(method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: ProtocolVersion::V2_0,
            method: method.into(),
            params,
            id: None,
        }
    }

    pub fn with_array_params(
        method: impl Into<String>,
        params: Vec<Value>,
        id: RequestId,
    ) -> Self {
        Self::new(method, Some(RequestParams::Array(params)), id)
    }

    pub fn with_object_params(
        method: impl Into<String>,
        params: Map<String, Value>,
        id: RequestId,
    ) -> Self {
        Self::new(method, Some(RequestParams::Object(params)), id)
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Get a parameter by index (if params are an array)
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }

    /// Render the request into its wire form.
    ///
    /// `params` is emitted only when present, `id` only when the request is
    /// not a notification.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            fields::VERSION.to_string(),
            Value::from(self.version.as_str()),
        );
        object.insert(fields::METHOD.to_string(), Value::from(self.method.clone()));
        if let Some(params) = &self.params {
            object.insert(fields::PARAMS.to_string(), params.to_value());
        }
        if let Some(id) = &self.id {
            object.insert(fields::ID.to_string(), id_to_value(id));
        }
        Value::Object(object)
    }

    /// Decode the wire form of a request.
    ///
    /// Enforces the message rules: the version marker must be present and
    /// equal `"2.0"`, `method` must be a string, `params` (when present and
    /// not null) must be an array or object, and `id` (when present) must be
    /// a string or a number. An explicit `"id": null` is rejected - absence
    /// is the only way to mark a notification.
    pub fn from_value(node: &Value) -> Result<Self, CodecError> {
        let Value::Object(object) = node else {
            return Err(CodecError::NotAnObject);
        };

        match object.get(fields::VERSION) {
            None => return Err(CodecError::MissingVersion),
            Some(Value::String(version)) if version == crate::JSONRPC_VERSION => {}
            Some(Value::String(version)) => {
                return Err(CodecError::UnsupportedVersion(version.clone()));
            }
            Some(_) => return Err(CodecError::VersionNotAString),
        }

        let method = match object.get(fields::METHOD) {
            None => return Err(CodecError::MissingMethod),
            Some(Value::String(method)) => method.clone(),
            Some(_) => return Err(CodecError::MethodNotAString),
        };

        let params = match object.get(fields::PARAMS) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(RequestParams::Array(items.clone())),
            Some(Value::Object(map)) => Some(RequestParams::Object(map.clone())),
            Some(other) => return Err(CodecError::InvalidParams(TypeHint::of(other).name())),
        };

        let id = match object.get(fields::ID) {
            None => None,
            Some(node) => Some(
                RequestId::from_node(node)
                    .ok_or(CodecError::InvalidRequestId(TypeHint::of(node).name()))?,
            ),
        };

        Ok(Self {
            version: ProtocolVersion::V2_0,
            method,
            params,
            id,
        })
    }

    /// Decode a request from wire text.
    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        let node: Value = serde_json::from_str(text)?;
        Self::from_value(&node)
    }

    /// Encode the request to wire text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

fn id_to_value(id: &RequestId) -> Value {
    match id {
        RequestId::String(s) => Value::from(s.clone()),
        RequestId::Number(n) => Value::from(*n),
    }
}

impl Serialize for JsonRpcRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonRpcRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let node = Value::deserialize(deserializer)?;
        JsonRpcRequest::from_value(&node).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_request_round_trip() {
        let request = JsonRpcRequest::with_array_params(
            "process",
            vec![json!("test"), json!(42), json!(true)],
            RequestId::Number(2),
        );

        let encoded = to_string(&request).unwrap();
        let decoded: JsonRpcRequest = from_str(&encoded).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(decoded.get_param_index(0), Some(&json!("test")));
        assert_eq!(decoded.get_param_index(3), None);
    }

    #[test]
    fn test_request_with_object_params() {
        let mut params = Map::new();
        params.insert("name".to_string(), json!("test"));
        params.insert("value".to_string(), json!(42));

        let request =
            JsonRpcRequest::with_object_params("set_value", params, RequestId::from("req1"));

        assert_eq!(request.get_param("name"), Some(&json!("test")));
        assert_eq!(request.get_param("value"), Some(&json!(42)));
        assert_eq!(request.get_param("missing"), None);
    }

    #[test]
    fn test_notification_omits_id() {
        let notification = JsonRpcRequest::notification("ping", None);
        assert!(notification.is_notification());

        let encoded = to_string(&notification).unwrap();
        assert!(!encoded.contains("\"id\""));
        assert!(encoded.contains("\"jsonrpc\":\"2.0\""));
        assert!(encoded.contains("\"method\":\"ping\""));

        let decoded: JsonRpcRequest = from_str(&encoded).unwrap();
        assert_eq!(decoded, notification);
    }

    #[test]
    fn test_decode_requires_version_marker() {
        assert!(from_str::<JsonRpcRequest>(r#"{"method": "m", "id": 1}"#).is_err());
        assert!(
            from_str::<JsonRpcRequest>(r#"{"jsonrpc": "1.0", "method": "m", "id": 1}"#).is_err()
        );
        assert!(from_str::<JsonRpcRequest>(r#"{"jsonrpc": 2.0, "method": "m", "id": 1}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_method() {
        assert!(from_str::<JsonRpcRequest>(r#"{"jsonrpc": "2.0", "id": 1}"#).is_err());
        assert!(from_str::<JsonRpcRequest>(r#"{"jsonrpc": "2.0", "method": 5, "id": 1}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_scalar_params() {
        let raw = r#"{"jsonrpc": "2.0", "method": "m", "params": 3, "id": 1}"#;
        assert!(from_str::<JsonRpcRequest>(raw).is_err());
    }

    #[test]
    fn test_decode_null_params_as_absent() {
        let raw = r#"{"jsonrpc": "2.0", "method": "m", "params": null, "id": 1}"#;
        let request: JsonRpcRequest = from_str(raw).unwrap();
        assert!(request.params.is_none());
    }

    #[test]
    fn test_decode_rejects_null_or_structured_id() {
        assert!(
            from_str::<JsonRpcRequest>(r#"{"jsonrpc": "2.0", "method": "m", "id": null}"#).is_err()
        );
        assert!(
            from_str::<JsonRpcRequest>(r#"{"jsonrpc": "2.0", "method": "m", "id": [1]}"#).is_err()
        );
        assert!(
            from_str::<JsonRpcRequest>(r#"{"jsonrpc": "2.0", "method": "m", "id": {"a": 1}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_decode_absent_id_is_notification() {
        let raw = r#"{"jsonrpc": "2.0", "method": "log", "params": ["hello"]}"#;
        let request: JsonRpcRequest = from_str(raw).unwrap();
        assert!(request.is_notification());
        assert_eq!(request.method, "log");
    }
}
