use std::backtrace::Backtrace;
use std::error::Error;

use serde_json::{Map, Value};

/// Controls how much diagnostic detail is attached to wire error `data`.
///
/// The rendered message and failure detail are always included; the
/// captured backtrace and the nested cause chain are opt-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticConfig {
    pub backtrace: bool,
    pub cause_chain: bool,
}

impl DiagnosticConfig {
    pub fn with_backtrace(mut self, backtrace: bool) -> Self {
        self.backtrace = backtrace;
        self
    }

    pub fn with_cause_chain(mut self, cause_chain: bool) -> Self {
        self.cause_chain = cause_chain;
        self
    }
}

/// Render a failure into a JSON object suitable for a wire error's `data`
/// field.
///
/// The object carries the failure's rendered message and its debug form,
/// plus (per config) a captured backtrace and the recursively rendered
/// cause chain. It cannot be turned back into the failure - it is a debug
/// aid only.
pub fn failure_to_value(failure: &(dyn Error + 'static), config: &DiagnosticConfig) -> Value {
    let mut object = Map::new();
    object.insert("message".to_string(), Value::from(failure.to_string()));
    object.insert("detail".to_string(), Value::from(format!("{failure:?}")));

    if config.backtrace {
        let backtrace = Backtrace::force_capture().to_string();
        let frames: Vec<Value> = backtrace.lines().map(Value::from).collect();
        object.insert("backtrace".to_string(), Value::Array(frames));
    }

    if config.cause_chain {
        if let Some(source) = failure.source() {
            object.insert("cause".to_string(), failure_to_value(source, config));
        }
    }

    Value::Object(object)
}
