//! A typed client over an in-process executor.
//!
//! The remote surface is wrapped in a plain struct whose methods forward
//! through `RpcClient::call_op` with their operation signatures - the
//! explicit-builder replacement for a runtime proxy object.

use std::sync::Arc;

use async_trait::async_trait;
use parley_client::prelude::*;
use parley_json_rpc::{Executor, FunctionOperation, OperationRegistry};
use serde_json::json;

struct InProcessTransporter {
    executor: Executor,
}

#[async_trait]
impl Transporter for InProcessTransporter {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        Ok(self.executor.execute(request.clone()).await)
    }
}

/// The typed view of the remote calculator.
struct CalculatorClient {
    rpc: RpcClient,
    plus_op: OperationSignature,
    concat_op: OperationSignature,
}

impl CalculatorClient {
    fn new(rpc: RpcClient) -> Self {
        Self {
            rpc,
            plus_op: OperationSignature::new("plus")
                .param("n1", TypeHint::Integer)
                .param("n2", TypeHint::Integer)
                .named_params(true)
                .returns(TypeHint::Integer),
            concat_op: OperationSignature::new("concat")
                .param("text", TypeHint::String)
                .param("number", TypeHint::Integer)
                .named_params(true)
                .returns(TypeHint::String),
        }
    }

    async fn plus(&self, n1: i64, n2: i64) -> ClientResult<i64> {
        let value = self.rpc.call_op(&self.plus_op, &[json!(n1), json!(n2)]).await?;
        Ok(value.as_i64().unwrap_or_default())
    }

    async fn concat(&self, text: &str, number: i64) -> ClientResult<String> {
        let value = self
            .rpc
            .call_op(&self.concat_op, &[json!(text), json!(number)])
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

fn registry() -> OperationRegistry {
    let mut registry = OperationRegistry::new();
    registry
        .register(FunctionOperation::new(
            OperationSignature::new("plus")
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
        .expect("fresh registry");
    registry
        .register(FunctionOperation::new(
            OperationSignature::new("concat")
                .param("text", TypeHint::String)
                .param("number", TypeHint::Integer)
                .named_params(true)
                .returns(TypeHint::String),
            |args| async move {
                let text = args[0].as_str().unwrap_or_default().to_string();
                let number = args[1].as_i64().unwrap_or_default();
                Ok(Some(json!(format!("{text}{number}"))))
            },
        ))
        .expect("fresh registry");
    registry
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let executor = Executor::new(Arc::new(registry()));
    let rpc = RpcClient::new(Arc::new(InProcessTransporter { executor }));
    let calculator = CalculatorClient::new(rpc);

    match calculator.plus(42, 23).await {
        Ok(sum) => println!("plus(42, 23) = {sum}"),
        Err(e) => println!("plus failed: {e}"),
    }

    match calculator.concat("Test", 123).await {
        Ok(text) => println!("concat(\"Test\", 123) = {text:?}"),
        Err(e) => println!("concat failed: {e}"),
    }

    // Calling an unregistered method surfaces the wire error.
    match calculator.rpc.call("multiply", &[json!(2), json!(3)]).await {
        Ok(value) => println!("multiply = {value}"),
        Err(e) => println!("multiply failed as expected: {e}"),
    }
}
