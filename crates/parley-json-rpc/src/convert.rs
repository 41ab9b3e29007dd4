use serde_json::Value;
use thiserror::Error;

use crate::signature::TypeHint;

/// Failure raised by a [`TypeConverter`].
///
/// `TypeMismatch` is the expected, caller-recoverable condition (the
/// executor classifies it as Invalid Params); everything else is a
/// converter defect and surfaces as a Convert-*-Failure.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("conversion failed: {0}")]
    Other(String),
}

impl ConvertError {
    pub fn mismatch(expected: &TypeHint, found: &Value) -> Self {
        ConvertError::TypeMismatch {
            expected: expected.name(),
            found: TypeHint::of(found).name(),
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, ConvertError::TypeMismatch { .. })
    }
}

/// Per-argument type conversion, pluggable on both sides of the wire.
///
/// `to_value` turns a decoded JSON node into the argument value handed to an
/// operation; `to_node` turns an argument or return value into its JSON
/// node. Either direction must report shape violations as
/// [`ConvertError::TypeMismatch`] so callers can tell them apart from
/// converter defects.
pub trait TypeConverter: Send + Sync {
    fn to_value(&self, node: &Value, expect: &TypeHint) -> Result<Value, ConvertError>;

    fn to_node(&self, value: Value, expect: &TypeHint) -> Result<Value, ConvertError>;
}

/// The default converter: arguments pass through untouched when their JSON
/// shape satisfies the declared hint, and are rejected otherwise. No
/// coercion is attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictConverter;

impl TypeConverter for StrictConverter {
    fn to_value(&self, node: &Value, expect: &TypeHint) -> Result<Value, ConvertError> {
        if expect.admits(node) {
            Ok(node.clone())
        } else {
            Err(ConvertError::mismatch(expect, node))
        }
    }

    fn to_node(&self, value: Value, expect: &TypeHint) -> Result<Value, ConvertError> {
        if expect.admits(&value) {
            Ok(value)
        } else {
            Err(ConvertError::mismatch(expect, &value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_passthrough() {
        let converter = StrictConverter;
        assert_eq!(
            converter.to_value(&json!(42), &TypeHint::Integer).unwrap(),
            json!(42)
        );
        assert_eq!(
            converter.to_node(json!("x"), &TypeHint::String).unwrap(),
            json!("x")
        );
        assert_eq!(
            converter.to_value(&json!(null), &TypeHint::Any).unwrap(),
            json!(null)
        );
    }

    #[test]
    fn test_strict_mismatch() {
        let converter = StrictConverter;
        let err = converter
            .to_value(&json!("42"), &TypeHint::Integer)
            .unwrap_err();
        assert!(err.is_mismatch());
        assert_eq!(
            err.to_string(),
            "type mismatch: expected integer, found string"
        );

        let err = converter
            .to_node(json!(1.5), &TypeHint::Integer)
            .unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_missing_named_argument_is_a_mismatch() {
        // A named parameter absent from the params object reaches the
        // converter as JSON null.
        let converter = StrictConverter;
        let err = converter
            .to_value(&Value::Null, &TypeHint::Integer)
            .unwrap_err();
        assert!(err.is_mismatch());
    }
}
