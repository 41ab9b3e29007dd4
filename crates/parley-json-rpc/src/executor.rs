use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::convert::TypeConverter;
use crate::diagnostics::{DiagnosticConfig, failure_to_value};
use crate::error::{ErrorKind, ErrorObject};
use crate::params::ParameterDeserializer;
use crate::request::JsonRpcRequest;
use crate::response::{JsonRpcResponse, ResponseId};
use crate::return_value::ReturnValueSerializer;
use crate::signature::OperationSignature;

/// Failure raised by an operation's body.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// A deliberate application-level error. Dispatch propagates the wire
    /// error verbatim instead of wrapping it as Internal Error.
    #[error("application error [{}] {}", .0.code, .0.message)]
    Rpc(ErrorObject),

    /// Anything else the operation raised.
    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl InvokeError {
    /// Signal an application-level error with an explicit code, message
    /// and optional data.
    pub fn application(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        InvokeError::Rpc(ErrorObject::new(code, message, data))
    }

    pub fn other(failure: impl std::error::Error + Send + Sync + 'static) -> Self {
        InvokeError::Other(Box::new(failure))
    }
}

/// The resolved, callable target of a request's method name. Opaque to the
/// engine beyond its signature and "invoke with arguments, yield a value or
/// fail".
#[async_trait]
pub trait Operation: Send + Sync {
    fn signature(&self) -> &OperationSignature;

    /// `Ok(None)` means the operation has no return value; the codec
    /// encodes it as an explicit JSON null.
    async fn invoke(&self, args: Vec<Value>) -> Result<Option<Value>, InvokeError>;
}

/// Failure raised by a [`Resolver`]. "Not found" must stay distinguishable
/// from any other resolver defect: the former answers with Method Not
/// Found, the latter with Internal Error.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no operation registered for method `{0}`")]
    NotFound(String),

    #[error("resolver failure: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Maps a method name to a callable operation handle. How the mapping is
/// backed (a static table, a registry, reflective lookup) is a collaborator
/// concern.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, method: &str) -> Result<Arc<dyn Operation>, ResolveError>;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("an operation is already registered for method `{0}`")]
    DuplicateMethod(String),
}

/// A name-to-operation table built at startup and read-only afterwards,
/// safe for unsynchronized concurrent reads. Registering the same method
/// name twice is refused rather than silently overwritten.
#[derive(Default)]
pub struct OperationRegistry {
    operations: HashMap<String, Arc<dyn Operation>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    pub fn register<O>(&mut self, operation: O) -> Result<(), RegistryError>
    where
        O: Operation + 'static,
    {
        self.register_arc(Arc::new(operation))
    }

    pub fn register_arc(&mut self, operation: Arc<dyn Operation>) -> Result<(), RegistryError> {
        let method = operation.signature().method.clone();
        if self.operations.contains_key(&method) {
            return Err(RegistryError::DuplicateMethod(method));
        }
        self.operations.insert(method, operation);
        Ok(())
    }

    pub fn methods(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }
}

#[async_trait]
impl Resolver for OperationRegistry {
    async fn resolve(&self, method: &str) -> Result<Arc<dyn Operation>, ResolveError> {
        self.operations
            .get(method)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(method.to_string()))
    }
}

type OperationFn =
    Box<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Option<Value>, InvokeError>> + Send + Sync>;

/// An operation backed by an async closure.
pub struct FunctionOperation {
    signature: OperationSignature,
    func: OperationFn,
}

impl FunctionOperation {
    pub fn new<F, Fut>(signature: OperationSignature, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, InvokeError>> + Send + 'static,
    {
        Self {
            signature,
            func: Box::new(move |args| Box::pin(func(args))),
        }
    }
}

#[async_trait]
impl Operation for FunctionOperation {
    fn signature(&self) -> &OperationSignature {
        &self.signature
    }

    async fn invoke(&self, args: Vec<Value>) -> Result<Option<Value>, InvokeError> {
        (self.func)(args).await
    }
}

#[derive(Debug, Error)]
#[error("method cannot be empty")]
struct EmptyMethod;

/// The server-side dispatch engine.
///
/// Each call runs one request through validate, resolve, parameter
/// deserialization, invoke, and result serialization; every failure mode
/// maps to a wire error in the returned response and nothing escapes the
/// dispatch boundary. Processing is synchronous to completion - no state is
/// carried across calls, so independent requests may be executed
/// concurrently against a shared executor.
pub struct Executor {
    resolver: Arc<dyn Resolver>,
    params: ParameterDeserializer,
    returns: ReturnValueSerializer,
    diagnostics: DiagnosticConfig,
}

impl Executor {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            params: ParameterDeserializer::default(),
            returns: ReturnValueSerializer::default(),
            diagnostics: DiagnosticConfig::default().with_cause_chain(true),
        }
    }

    pub fn with_converter(mut self, converter: Arc<dyn TypeConverter>) -> Self {
        self.params = ParameterDeserializer::new(converter.clone());
        self.returns = ReturnValueSerializer::new(converter);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Execute a request and produce its response.
    ///
    /// A response is computed even for a notification (with the id left
    /// absent); suppressing its delivery is the transporter's job, not the
    /// engine's.
    pub async fn execute(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let response_id = ResponseId::mirroring(request.id.clone());

        if request.method.trim().is_empty() {
            error!("invalid request: empty method");
            let data = failure_to_value(&EmptyMethod, &DiagnosticConfig::default());
            return JsonRpcResponse::failure(
                response_id,
                ErrorKind::InvalidRequest.to_error_with_data(data),
            );
        }
        debug!(method = %request.method, "request validated");

        let operation = match self.resolver.resolve(&request.method).await {
            Ok(operation) => operation,
            Err(failure @ ResolveError::NotFound(_)) => {
                error!(method = %request.method, "method not found");
                let data = failure_to_value(
                    &failure,
                    &DiagnosticConfig::default().with_cause_chain(true),
                );
                return JsonRpcResponse::failure(
                    response_id,
                    ErrorKind::MethodNotFound.to_error_with_data(data),
                );
            }
            Err(failure) => {
                error!(method = %request.method, %failure, "resolver failure");
                let data = failure_to_value(&failure, &self.diagnostics);
                return JsonRpcResponse::failure(
                    response_id,
                    ErrorKind::InternalError.to_error_with_data(data),
                );
            }
        };

        let args = match self.params.deserialize(operation.signature(), &request) {
            Ok(args) => args,
            Err(failure) if failure.is_mismatch() => {
                error!(method = %request.method, %failure, "invalid params");
                return JsonRpcResponse::failure(response_id, ErrorKind::InvalidParams.to_error());
            }
            Err(failure) => {
                error!(method = %request.method, %failure, "parameter conversion failure");
                let data = failure_to_value(&failure, &self.diagnostics);
                return JsonRpcResponse::failure(
                    response_id,
                    ErrorKind::ConvertParamsFailure.to_error_with_data(data),
                );
            }
        };

        debug!(method = %request.method, "invoking operation");
        let value = match operation.invoke(args).await {
            Ok(value) => value,
            Err(InvokeError::Rpc(wire_error)) => {
                // Deliberate application error: propagated verbatim.
                return JsonRpcResponse::failure(response_id, wire_error);
            }
            Err(failure) => {
                error!(method = %request.method, %failure, "operation failure");
                let data = failure_to_value(&failure, &self.diagnostics);
                return JsonRpcResponse::failure(
                    response_id,
                    ErrorKind::InternalError.to_error_with_data(data),
                );
            }
        };

        match self.returns.serialize(operation.signature(), value) {
            Ok(result) => {
                debug!(method = %request.method, "request processed");
                JsonRpcResponse::success(response_id, result)
            }
            Err(failure) => {
                error!(method = %request.method, %failure, "return value conversion failure");
                let data = failure_to_value(&failure, &self.diagnostics);
                JsonRpcResponse::failure(
                    response_id,
                    ErrorKind::ConvertReturnValueFailure.to_error_with_data(data),
                )
            }
        }
    }
}
