//! The transporter contract.
//!
//! Delivering bytes is not this crate's business: callers plug in whatever
//! moves a request to the peer and brings a response back - HTTP, a socket,
//! a queue, an in-process executor. The engine's only expectation is the
//! single `send` operation below.

use async_trait::async_trait;
use parley_json_rpc::{JsonRpcRequest, JsonRpcResponse};

use crate::error::TransportError;

/// Carries one request to the peer and returns its response.
///
/// A transporter for a real wire should encode the request to text, ship
/// it, and decode the reply; it is also the layer responsible for NOT
/// delivering responses to notifications. Any failure is opaque to the
/// client and surfaces as the Request Failure wire error.
#[async_trait]
pub trait Transporter: Send + Sync {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;
}
