//! # JSON-RPC 2.0 Protocol Engine
//!
//! A pure, transport-agnostic JSON-RPC 2.0 implementation: the wire-level
//! message model with its strict encode/decode rules, the parameter and
//! return value codecs, and the server-side dispatch engine. No
//! transport-specific code lives here - delivering bytes is the job of an
//! external transporter.
//!
//! ## Features
//! - Full JSON-RPC 2.0 message compliance, tested against literal wire text
//! - Transport agnostic (works with HTTP, WebSocket, TCP, queues, etc.)
//! - Pluggable operation resolution and per-argument type conversion
//! - Every dispatch failure mapped to a standard wire error code

pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod params;
pub mod request;
pub mod response;
pub mod return_value;
pub mod signature;
pub mod types;

#[cfg(feature = "async")]
pub mod executor;

pub mod prelude;

// Re-export main types
pub use convert::{ConvertError, StrictConverter, TypeConverter};
pub use diagnostics::{DiagnosticConfig, failure_to_value};
pub use error::{CodecError, ErrorKind, ErrorObject};
pub use params::{ParameterDeserializer, ParameterError, ParameterSerializer};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcResponse, ResponseId, ResponsePayload};
pub use return_value::{ReturnValueDeserializer, ReturnValueError, ReturnValueSerializer};
pub use signature::{OperationSignature, ParamSpec, TypeHint};
pub use types::{ProtocolVersion, RequestId};

#[cfg(feature = "async")]
pub use executor::{
    Executor, FunctionOperation, InvokeError, Operation, OperationRegistry, RegistryError,
    ResolveError, Resolver,
};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Wire field names, bit-exact per the JSON-RPC 2.0 specification
pub mod fields {
    pub const VERSION: &str = "jsonrpc";
    pub const METHOD: &str = "method";
    pub const PARAMS: &str = "params";
    pub const ID: &str = "id";
    pub const RESULT: &str = "result";
    pub const ERROR: &str = "error";
    pub const CODE: &str = "code";
    pub const MESSAGE: &str = "message";
    pub const DATA: &str = "data";
}

/// Standard and extension JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Implementation extension range
    pub const REQUEST_FAILURE: i64 = -32901;
    pub const CONVERT_PARAMS_FAILURE: i64 = -32902;
    pub const CONVERT_RETURN_VALUE_FAILURE: i64 = -32903;
}
