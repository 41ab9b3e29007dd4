//! Simple calculator dispatch example
//!
//! Registers two arithmetic operations, feeds the executor raw JSON-RPC
//! text (including requests that are expected to fail), and prints the
//! encoded responses.

use std::sync::Arc;

use parley_json_rpc::prelude::*;
use serde_json::json;

fn registry() -> OperationRegistry {
    let mut registry = OperationRegistry::new();

    registry
        .register(FunctionOperation::new(
            OperationSignature::new("add")
                .param("a", TypeHint::Number)
                .param("b", TypeHint::Number)
                .named_params(true)
                .returns(TypeHint::Number),
            |args| async move {
                let a = args[0].as_f64().unwrap_or_default();
                let b = args[1].as_f64().unwrap_or_default();
                Ok(Some(json!(a + b)))
            },
        ))
        .expect("fresh registry");

    registry
        .register(FunctionOperation::new(
            OperationSignature::new("subtract")
                .param("a", TypeHint::Number)
                .param("b", TypeHint::Number)
                .named_params(true)
                .returns(TypeHint::Number),
            |args| async move {
                let a = args[0].as_f64().unwrap_or_default();
                let b = args[1].as_f64().unwrap_or_default();
                Ok(Some(json!(a - b)))
            },
        ))
        .expect("fresh registry");

    registry
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let executor = Executor::new(Arc::new(registry()));

    let test_requests = [
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 5, "b": 3}, "id": 1}"#,
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": [10, 4], "id": 2}"#,
        // Unknown method
        r#"{"jsonrpc": "2.0", "method": "multiply", "params": {"a": 2, "b": 3}, "id": 3}"#,
        // Wrong parameter type
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": "invalid", "b": 5}, "id": 4}"#,
        // Not even a valid request
        r#"{"jsonrpc": "2.0", "params": [1]}"#,
    ];

    for raw in test_requests {
        println!("--> {raw}");
        match JsonRpcRequest::from_json(raw) {
            Ok(request) => {
                let suppress = request.is_notification();
                let response = executor.execute(request).await;
                if suppress {
                    println!("<-- (notification, response suppressed)");
                } else {
                    println!("<-- {}", response.to_json());
                }
            }
            Err(e) => {
                // The id could not be determined: answer with the null
                // id marker.
                let response = JsonRpcResponse::parse_failure(Some(json!(e.to_string())));
                println!("<-- {}", response.to_json());
            }
        }
        println!();
    }
}
