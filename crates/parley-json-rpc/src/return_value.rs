use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::convert::{ConvertError, StrictConverter, TypeConverter};
use crate::response::JsonRpcResponse;
use crate::signature::OperationSignature;

/// Failure raised by the return value codec.
#[derive(Debug, Error)]
pub enum ReturnValueError {
    #[error("an error response carries no return value")]
    ErrorResponse,

    #[error("return value conversion failed: {0}")]
    Convert(#[source] ConvertError),
}

/// Server-side: turns an operation's return value into the response
/// `result` node.
pub struct ReturnValueSerializer {
    converter: Arc<dyn TypeConverter>,
}

impl ReturnValueSerializer {
    pub fn new(converter: Arc<dyn TypeConverter>) -> Self {
        Self { converter }
    }

    /// `None` is the explicit "no return value" and encodes as JSON null;
    /// anything else is converted against the declared return hint.
    pub fn serialize(
        &self,
        signature: &OperationSignature,
        value: Option<Value>,
    ) -> Result<Value, ReturnValueError> {
        match value {
            None => Ok(Value::Null),
            Some(value) => self
                .converter
                .to_node(value, &signature.returns)
                .map_err(ReturnValueError::Convert),
        }
    }
}

impl Default for ReturnValueSerializer {
    fn default() -> Self {
        Self::new(Arc::new(StrictConverter))
    }
}

/// Client-side: turns a success response's `result` node into the typed
/// return value.
pub struct ReturnValueDeserializer {
    converter: Arc<dyn TypeConverter>,
}

impl ReturnValueDeserializer {
    pub fn new(converter: Arc<dyn TypeConverter>) -> Self {
        Self { converter }
    }

    /// Callers must check `is_error()` first; handing an error response to
    /// this codec is a usage error, not a conversion failure.
    pub fn deserialize(
        &self,
        signature: &OperationSignature,
        response: &JsonRpcResponse,
    ) -> Result<Value, ReturnValueError> {
        let result = response.result().ok_or(ReturnValueError::ErrorResponse)?;
        self.converter
            .to_value(result, &signature.returns)
            .map_err(ReturnValueError::Convert)
    }
}

impl Default for ReturnValueDeserializer {
    fn default() -> Self {
        Self::new(Arc::new(StrictConverter))
    }
}
