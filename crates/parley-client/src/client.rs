//! The client invocation path.

use std::sync::Arc;

use parley_json_rpc::{
    ErrorKind, JsonRpcRequest, JsonRpcResponse, OperationSignature, ParameterSerializer,
    RequestId, ReturnValueDeserializer, StrictConverter, TypeConverter, failure_to_value,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::builder::RequestBuilder;
use crate::config::ClientConfig;
use crate::error::{ClientResult, RequestError};
use crate::transport::Transporter;

/// Invokes remote operations over a pluggable [`Transporter`].
///
/// Every call builds a fresh request with a collision-resistant random id,
/// hands it to the transporter, and reconciles the response into a return
/// value or a raised [`RequestError`]. A server-side wire error is never
/// swallowed - it surfaces verbatim in the raised error.
pub struct RpcClient {
    transporter: Arc<dyn Transporter>,
    builder: RequestBuilder,
    returns: ReturnValueDeserializer,
    config: ClientConfig,
}

impl RpcClient {
    pub fn new(transporter: Arc<dyn Transporter>) -> Self {
        Self::with_converter(transporter, Arc::new(StrictConverter), ClientConfig::default())
    }

    pub fn with_config(transporter: Arc<dyn Transporter>, config: ClientConfig) -> Self {
        Self::with_converter(transporter, Arc::new(StrictConverter), config)
    }

    pub fn with_converter(
        transporter: Arc<dyn Transporter>,
        converter: Arc<dyn TypeConverter>,
        config: ClientConfig,
    ) -> Self {
        let serializer = ParameterSerializer::new(converter.clone())
            .with_named_params(config.named_params);
        Self {
            transporter,
            builder: RequestBuilder::new(serializer).with_diagnostics(config.diagnostics),
            returns: ReturnValueDeserializer::new(converter),
            config,
        }
    }

    /// Call an operation by bare method name. Arguments travel
    /// positionally and the raw result node is returned.
    pub async fn call(&self, method: &str, args: &[Value]) -> ClientResult<Value> {
        let request = self.builder.build(method, Some(next_id()), args)?;
        let response = self.round_trip(request).await?;
        match response.error() {
            Some(wire_error) => Err(RequestError::new(wire_error.clone())),
            None => Ok(response.result().cloned().unwrap_or(Value::Null)),
        }
    }

    /// Call an operation through its signature: arguments may travel as
    /// named params, and the result is converted against the declared
    /// return hint.
    pub async fn call_op(
        &self,
        signature: &OperationSignature,
        args: &[Value],
    ) -> ClientResult<Value> {
        let request = self.builder.build_for(signature, Some(next_id()), args)?;
        let response = self.round_trip(request).await?;
        if let Some(wire_error) = response.error() {
            return Err(RequestError::new(wire_error.clone()));
        }
        self.returns.deserialize(signature, &response).map_err(|e| {
            let data = failure_to_value(&e, &self.config.diagnostics);
            RequestError::with_source(
                ErrorKind::ConvertReturnValueFailure.to_error_with_data(data),
                e,
            )
        })
    }

    /// Send a notification: the request carries no id and any transported
    /// response body is discarded.
    pub async fn notify(&self, method: &str, args: &[Value]) -> ClientResult<()> {
        let request = self.builder.build(method, None, args)?;
        self.round_trip(request).await.map(|_| ())
    }

    async fn round_trip(&self, request: JsonRpcRequest) -> ClientResult<JsonRpcResponse> {
        debug!(method = %request.method, "sending request");
        match self.transporter.send(&request).await {
            Ok(response) => Ok(response),
            Err(failure) => {
                error!(method = %request.method, %failure, "transport failure");
                let data = failure_to_value(&failure, &self.config.diagnostics);
                Err(RequestError::with_source(
                    ErrorKind::RequestFailure.to_error_with_data(data),
                    failure,
                ))
            }
        }
    }
}

/// A fresh id per call. There is no central sequencing authority, so ids
/// are drawn from a wide random source to stay collision-resistant under
/// concurrent calls.
fn next_id() -> RequestId {
    RequestId::Number(rand::random::<i64>())
}
