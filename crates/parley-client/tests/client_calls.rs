//! Full-loop tests: a client calling into a real dispatch engine through
//! an in-process transporter, including the wire codec on both legs.

use std::sync::Arc;

use async_trait::async_trait;
use parley_client::{ClientConfig, RpcClient, TransportError, Transporter};
use parley_json_rpc::{
    Executor, FunctionOperation, InvokeError, JsonRpcRequest, JsonRpcResponse,
    OperationRegistry, OperationSignature, TypeHint, error_codes,
};
use serde_json::json;

/// Round-trips every request through its encoded text, exactly as a real
/// wire would, and suppresses responses to notifications.
struct LoopbackTransporter {
    executor: Executor,
}

#[async_trait]
impl Transporter for LoopbackTransporter {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let raw = serde_json::to_string(request)
            .map_err(|e| TransportError::with_source("request encoding failed", e))?;
        let decoded: JsonRpcRequest = serde_json::from_str(&raw)
            .map_err(|e| TransportError::with_source("request decoding failed", e))?;

        let suppress = decoded.is_notification();
        let response = self.executor.execute(decoded).await;
        if suppress {
            return Ok(response);
        }

        let raw = serde_json::to_string(&response)
            .map_err(|e| TransportError::with_source("response encoding failed", e))?;
        serde_json::from_str(&raw)
            .map_err(|e| TransportError::with_source("response decoding failed", e))
    }
}

fn loopback_client() -> RpcClient {
    let mut registry = OperationRegistry::new();
    registry
        .register(FunctionOperation::new(
            OperationSignature::new("getMagicNumber")
                .param("n1", TypeHint::Integer)
                .param("n2", TypeHint::Integer)
                .named_params(true)
                .returns(TypeHint::Integer),
            |args| async move {
                let n1 = args[0].as_i64().unwrap_or_default();
                let n2 = args[1].as_i64().unwrap_or_default();
                Ok(Some(json!(n1 + n2)))
            },
        ))
        .unwrap();
    registry
        .register(FunctionOperation::new(
            OperationSignature::new("fails"),
            |_args| async move { Err(InvokeError::application(1, "Test error.", None)) },
        ))
        .unwrap();

    let executor = Executor::new(Arc::new(registry));
    RpcClient::new(Arc::new(LoopbackTransporter { executor }))
}

fn magic_signature() -> OperationSignature {
    OperationSignature::new("getMagicNumber")
        .param("n1", TypeHint::Integer)
        .param("n2", TypeHint::Integer)
        .named_params(true)
        .returns(TypeHint::Integer)
}

#[tokio::test]
async fn typed_call_round_trips_named_params() {
    let value = loopback_client()
        .call_op(&magic_signature(), &[json!(12), json!(67)])
        .await
        .unwrap();
    assert_eq!(value, json!(79));
}

#[tokio::test]
async fn ad_hoc_call_round_trips_positionally() {
    let value = loopback_client()
        .call("getMagicNumber", &[json!(42), json!(23)])
        .await
        .unwrap();
    assert_eq!(value, json!(65));
}

#[tokio::test]
async fn server_error_surfaces_as_request_error() {
    let failure = loopback_client().call("fails", &[]).await.unwrap_err();
    assert_eq!(failure.code(), 1);
    assert_eq!(failure.error().message, "Test error.");
}

#[tokio::test]
async fn unknown_method_error_carries_the_wire_code() {
    let failure = loopback_client()
        .call("noSuchMethod", &[])
        .await
        .unwrap_err();
    assert_eq!(failure.code(), error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn wrong_argument_count_is_rejected_client_side() {
    let failure = loopback_client()
        .call_op(&magic_signature(), &[json!(12)])
        .await
        .unwrap_err();
    assert_eq!(failure.code(), error_codes::CONVERT_PARAMS_FAILURE);
}

#[tokio::test]
async fn invalid_params_reported_by_server() {
    // An ad hoc call bypasses client-side signature checks, so the server
    // answers with Invalid Params.
    let failure = loopback_client()
        .call("getMagicNumber", &[json!(1)])
        .await
        .unwrap_err();
    assert_eq!(failure.code(), error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn positional_mode_can_be_forced() {
    let mut registry = OperationRegistry::new();
    registry
        .register(FunctionOperation::new(
            magic_signature(),
            |args| async move {
                let n1 = args[0].as_i64().unwrap_or_default();
                let n2 = args[1].as_i64().unwrap_or_default();
                Ok(Some(json!(n1 + n2)))
            },
        ))
        .unwrap();
    let executor = Executor::new(Arc::new(registry));

    let config = ClientConfig {
        named_params: false,
        ..ClientConfig::default()
    };
    let client = RpcClient::with_config(Arc::new(LoopbackTransporter { executor }), config);

    let value = client
        .call_op(&magic_signature(), &[json!(1), json!(2)])
        .await
        .unwrap();
    assert_eq!(value, json!(3));
}

#[tokio::test]
async fn notification_gets_no_reply() {
    // The loopback transporter hands back the executor's internal
    // response; its id must be absent so nothing is addressable to the
    // caller.
    struct AssertingTransporter {
        executor: Executor,
    }

    #[async_trait]
    impl Transporter for AssertingTransporter {
        async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            let response = self.executor.execute(request.clone()).await;
            assert!(response.id.is_absent());
            Ok(response)
        }
    }

    let mut registry = OperationRegistry::new();
    registry
        .register(FunctionOperation::new(
            OperationSignature::new("log").param("line", TypeHint::String),
            |_args| async move { Ok(None) },
        ))
        .unwrap();
    let executor = Executor::new(Arc::new(registry));
    let client = RpcClient::new(Arc::new(AssertingTransporter { executor }));

    client.notify("log", &[json!("hello")]).await.unwrap();
}
