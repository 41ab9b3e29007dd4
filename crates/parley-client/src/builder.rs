//! Request construction.

use parley_json_rpc::{
    DiagnosticConfig, ErrorKind, JsonRpcRequest, OperationSignature, ParameterSerializer,
    RequestId, failure_to_value,
};
use serde_json::Value;

use crate::error::RequestError;

/// Builds well-formed requests from call-site data, serializing arguments
/// through the parameter codec.
pub struct RequestBuilder {
    serializer: ParameterSerializer,
    diagnostics: DiagnosticConfig,
}

impl RequestBuilder {
    pub fn new(serializer: ParameterSerializer) -> Self {
        Self {
            serializer,
            diagnostics: DiagnosticConfig::default().with_cause_chain(true),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Build an ad hoc request from a bare method name. Arguments are
    /// always emitted positionally.
    pub fn build(
        &self,
        method: &str,
        id: Option<RequestId>,
        args: &[Value],
    ) -> Result<JsonRpcRequest, RequestError> {
        let params = self
            .serializer
            .serialize(None, args)
            .map_err(|e| self.serialization_failure(e))?;
        Ok(match id {
            Some(id) => JsonRpcRequest::new(method, params, id),
            None => JsonRpcRequest::notification(method, params),
        })
    }

    /// Build a request guided by the target operation's signature; may emit
    /// named params when the signature allows it.
    pub fn build_for(
        &self,
        signature: &OperationSignature,
        id: Option<RequestId>,
        args: &[Value],
    ) -> Result<JsonRpcRequest, RequestError> {
        let params = self
            .serializer
            .serialize(Some(signature), args)
            .map_err(|e| self.serialization_failure(e))?;
        Ok(match id {
            Some(id) => JsonRpcRequest::new(&signature.method, params, id),
            None => JsonRpcRequest::notification(&signature.method, params),
        })
    }

    fn serialization_failure(&self, failure: parley_json_rpc::ParameterError) -> RequestError {
        let data = failure_to_value(&failure, &self.diagnostics);
        RequestError::with_source(
            ErrorKind::ConvertParamsFailure.to_error_with_data(data),
            failure,
        )
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(ParameterSerializer::default())
    }
}
