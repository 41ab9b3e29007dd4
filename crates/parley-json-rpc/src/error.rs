use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::fields;

/// The fixed catalogue of protocol error conditions.
///
/// The first five are the standard JSON-RPC 2.0 codes; the `-329xx` range
/// holds the implementation extension codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Client-only: the transporter failed to deliver the request.
    RequestFailure,
    ConvertParamsFailure,
    ConvertReturnValueFailure,
}

impl ErrorKind {
    pub fn code(&self) -> i64 {
        match self {
            ErrorKind::ParseError => -32700,
            ErrorKind::InvalidRequest => -32600,
            ErrorKind::MethodNotFound => -32601,
            ErrorKind::InvalidParams => -32602,
            ErrorKind::InternalError => -32603,
            ErrorKind::RequestFailure => -32901,
            ErrorKind::ConvertParamsFailure => -32902,
            ErrorKind::ConvertReturnValueFailure => -32903,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "Parse request error",
            ErrorKind::InvalidRequest => "Invalid request",
            ErrorKind::MethodNotFound => "Method not found",
            ErrorKind::InvalidParams => "Invalid params",
            ErrorKind::InternalError => "Internal error",
            ErrorKind::RequestFailure => "Request failure",
            ErrorKind::ConvertParamsFailure => "Convert parameter failure",
            ErrorKind::ConvertReturnValueFailure => "Convert return value failure",
        }
    }

    /// Build a wire error with the default message and no data.
    pub fn to_error(&self) -> ErrorObject {
        ErrorObject::new(self.code(), self.message(), None)
    }

    /// Build a wire error with the default message and attached data.
    pub fn to_error_with_data(&self, data: Value) -> ErrorObject {
        ErrorObject::new(self.code(), self.message(), Some(data))
    }

    /// Build a wire error with an overridden message.
    pub fn to_error_with(&self, message: impl Into<String>, data: Option<Value>) -> ErrorObject {
        ErrorObject::new(self.code(), message, data)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// The `{code, message, data}` structure - the only error representation
/// that crosses the protocol boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(fields::CODE.to_string(), Value::from(self.code));
        object.insert(fields::MESSAGE.to_string(), Value::from(self.message.clone()));
        if let Some(data) = &self.data {
            object.insert(fields::DATA.to_string(), data.clone());
        }
        Value::Object(object)
    }

    /// Decodes an `error` member. Requires an object with an integer `code`
    /// and a string `message`; `data` is free-form and optional.
    pub fn from_value(node: &Value) -> Result<Self, CodecError> {
        let Value::Object(object) = node else {
            return Err(CodecError::ErrorNotAnObject);
        };
        let code = object
            .get(fields::CODE)
            .and_then(Value::as_i64)
            .ok_or(CodecError::InvalidErrorCode)?;
        let message = match object.get(fields::MESSAGE) {
            Some(Value::String(message)) => message.clone(),
            _ => return Err(CodecError::InvalidErrorMessage),
        };
        let data = match object.get(fields::DATA) {
            None | Some(Value::Null) => None,
            Some(data) => Some(data.clone()),
        };
        Ok(ErrorObject::new(code, message, data))
    }
}

// Hashing must stay structural over all three fields; `Value` has no `Hash`
// impl, so the data node is hashed through its canonical rendering.
impl Hash for ErrorObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.message.hash(state);
        if let Some(data) = &self.data {
            data.to_string().hash(state);
        }
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Serialize for ErrorObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorObject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let node = Value::deserialize(deserializer)?;
        ErrorObject::from_value(&node).map_err(serde::de::Error::custom)
    }
}

impl From<ErrorKind> for ErrorObject {
    fn from(kind: ErrorKind) -> Self {
        kind.to_error()
    }
}

/// Violations of the wire-level message rules, raised while decoding or
/// encoding request/response payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the payload is not a JSON object")]
    NotAnObject,

    #[error("the `jsonrpc` version field is missing")]
    MissingVersion,

    #[error("the `jsonrpc` version field must be a string")]
    VersionNotAString,

    #[error("unsupported JSON-RPC version: {0}")]
    UnsupportedVersion(String),

    #[error("the `method` field is missing")]
    MissingMethod,

    #[error("the `method` field must be a string")]
    MethodNotAString,

    #[error("the `params` field must be an array or an object, found {0}")]
    InvalidParams(&'static str),

    #[error("the `id` field must be a string or a number, found {0}")]
    InvalidRequestId(&'static str),

    #[error("a response must contain an `id` field")]
    MissingResponseId,

    #[error("the response `id` field must be a string, a number or null, found {0}")]
    InvalidResponseId(&'static str),

    #[error("the response contains both `result` and `error` fields")]
    ResultAndError,

    #[error("the response contains neither a `result` nor an `error` field")]
    ResultOrErrorMissing,

    #[error("the `error` field must be an object")]
    ErrorNotAnObject,

    #[error("the error `code` field is missing or not an integer")]
    InvalidErrorCode,

    #[error("the error `message` field is missing or not a string")]
    InvalidErrorMessage,
}
