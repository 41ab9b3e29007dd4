//! Convenience re-exports for the common surface of the engine.

pub use crate::convert::{ConvertError, StrictConverter, TypeConverter};
pub use crate::diagnostics::DiagnosticConfig;
pub use crate::error::{ErrorKind, ErrorObject};
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcResponse, ResponseId};
pub use crate::signature::{OperationSignature, TypeHint};
pub use crate::types::RequestId;

#[cfg(feature = "async")]
pub use crate::executor::{
    Executor, FunctionOperation, InvokeError, Operation, OperationRegistry, Resolver,
};
