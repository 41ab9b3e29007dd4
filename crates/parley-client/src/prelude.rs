//! Convenience re-exports for building typed clients.

pub use crate::builder::RequestBuilder;
pub use crate::client::RpcClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ClientResult, RequestError, TransportError};
pub use crate::transport::Transporter;

pub use parley_json_rpc::{
    ErrorKind, ErrorObject, JsonRpcRequest, JsonRpcResponse, OperationSignature, RequestId,
    TypeHint,
};
