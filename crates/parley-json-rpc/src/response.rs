use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CodecError, ErrorObject, ErrorKind};
use crate::fields;
use crate::signature::TypeHint;
use crate::types::{ProtocolVersion, RequestId};

/// The id carried by a response.
///
/// `Id` mirrors the request id. `Null` is the explicit null marker used when
/// the request id could not be determined at all (e.g. a malformed body).
/// `Absent` models the deliberate non-reply to a notification and is the
/// only state whose encoding omits the `id` field entirely - the protocol
/// forbids actually delivering such a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseId {
    Id(RequestId),
    Null,
    Absent,
}

impl ResponseId {
    /// Mirror a request's id: present ids are echoed, a notification maps
    /// to `Absent`.
    pub fn mirroring(id: Option<RequestId>) -> Self {
        match id {
            Some(id) => ResponseId::Id(id),
            None => ResponseId::Absent,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResponseId::Null)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ResponseId::Absent)
    }

    pub fn as_request_id(&self) -> Option<&RequestId> {
        match self {
            ResponseId::Id(id) => Some(id),
            _ => None,
        }
    }
}

impl From<RequestId> for ResponseId {
    fn from(id: RequestId) -> Self {
        ResponseId::Id(id)
    }
}

/// Exactly one of `result` or `error` - never both, never neither.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// Success result, including an explicit JSON null for void operations.
    Success(Value),
    /// A wire error.
    Error(ErrorObject),
}

/// A JSON-RPC response.
///
/// The payload enum makes the result/error exclusivity hold by
/// construction; there is no way to build a response carrying both.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub version: ProtocolVersion,
    pub payload: ResponsePayload,
    pub id: ResponseId,
}

impl JsonRpcResponse {
    pub fn new(payload: ResponsePayload, id: ResponseId) -> Self {
        Self {
            version: ProtocolVersion::V2_0,
            payload,
            id,
        }
    }

    pub fn success(id: ResponseId, result: Value) -> Self {
        Self::new(ResponsePayload::Success(result), id)
    }

    pub fn failure(id: ResponseId, error: ErrorObject) -> Self {
        Self::new(ResponsePayload::Error(error), id)
    }

    /// The response for a body whose id could not even be extracted: a
    /// Parse Error carrying the null id marker.
    pub fn parse_failure(data: Option<Value>) -> Self {
        let error = match data {
            Some(data) => ErrorKind::ParseError.to_error_with_data(data),
            None => ErrorKind::ParseError.to_error(),
        };
        Self::failure(ResponseId::Null, error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Success(result) => Some(result),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorObject> {
        match &self.payload {
            ResponsePayload::Error(error) => Some(error),
            ResponsePayload::Success(_) => None,
        }
    }

    /// Render the response into its wire form.
    ///
    /// `result` is emitted even when it is JSON null; `id` is emitted as
    /// null for the null marker and omitted only for the `Absent` non-reply
    /// state.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(
            fields::VERSION.to_string(),
            Value::from(self.version.as_str()),
        );
        match &self.payload {
            ResponsePayload::Success(result) => {
                object.insert(fields::RESULT.to_string(), result.clone());
            }
            ResponsePayload::Error(error) => {
                object.insert(fields::ERROR.to_string(), error.to_value());
            }
        }
        match &self.id {
            ResponseId::Id(RequestId::String(s)) => {
                object.insert(fields::ID.to_string(), Value::from(s.clone()));
            }
            ResponseId::Id(RequestId::Number(n)) => {
                object.insert(fields::ID.to_string(), Value::from(*n));
            }
            ResponseId::Null => {
                object.insert(fields::ID.to_string(), Value::Null);
            }
            ResponseId::Absent => {}
        }
        Value::Object(object)
    }

    /// Decode the wire form of a response.
    ///
    /// The version marker must be present and equal `"2.0"`; the `id` field
    /// must be present (it may be null); exactly one of `result`/`error`
    /// must be present; `error` must decode as a wire error object.
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

        let id = match object.get(fields::ID) {
            None => return Err(CodecError::MissingResponseId),
            Some(Value::Null) => ResponseId::Null,
            Some(node) => ResponseId::Id(
                RequestId::from_node(node)
                    .ok_or(CodecError::InvalidResponseId(TypeHint::of(node).name()))?,
            ),
        };

        let has_result = object.contains_key(fields::RESULT);
        let has_error = object.contains_key(fields::ERROR);
        let payload = match (has_result, has_error) {
            (true, true) => return Err(CodecError::ResultAndError),
            (false, false) => return Err(CodecError::ResultOrErrorMissing),
            (true, false) => {
                let result = object.get(fields::RESULT).cloned().unwrap_or(Value::Null);
                ResponsePayload::Success(result)
            }
            (false, true) => {
                let node = object.get(fields::ERROR).cloned().unwrap_or(Value::Null);
                ResponsePayload::Error(ErrorObject::from_value(&node)?)
            }
        };

        Ok(Self {
            version: ProtocolVersion::V2_0,
            payload,
            id,
        })
    }

    /// Decode a response from wire text.
    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        let node: Value = serde_json::from_str(text)?;
        Self::from_value(&node)
    }

    /// Encode the response to wire text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl Serialize for JsonRpcResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonRpcResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let node = Value::deserialize(deserializer)?;
        JsonRpcResponse::from_value(&node).map_err(serde::de::Error::custom)
    }
}
