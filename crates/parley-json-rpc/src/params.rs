use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::convert::{ConvertError, StrictConverter, TypeConverter};
use crate::request::{JsonRpcRequest, RequestParams};
use crate::signature::{OperationSignature, TypeHint};

/// Failure raised by the parameter codec.
///
/// `CountMismatch` and `TypeMismatch` are the expected, caller-recoverable
/// conditions that dispatch maps onto Invalid Params. Everything else is a
/// codec or converter defect and maps onto Convert Parameter Failure.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("parameter count mismatch, expect {expected}, but actual {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("parameter type mismatch for `{method}` [{param}]: {source}")]
    TypeMismatch {
        method: String,
        param: String,
        #[source]
        source: ConvertError,
    },

    #[error("operation `{0}` does not support named parameters")]
    NamedParamsUnsupported(String),

    #[error("parameter conversion failed: {0}")]
    Convert(#[source] ConvertError),
}

impl ParameterError {
    /// Whether dispatch should answer this failure with Invalid Params
    /// rather than Convert Parameter Failure.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            ParameterError::CountMismatch { .. } | ParameterError::TypeMismatch { .. }
        )
    }
}

/// Server-side half of the parameter codec: turns a request's `params` node
/// into the ordered argument list declared by the target operation.
pub struct ParameterDeserializer {
    converter: Arc<dyn TypeConverter>,
}

impl ParameterDeserializer {
    pub fn new(converter: Arc<dyn TypeConverter>) -> Self {
        Self { converter }
    }

    /// Match the request's params against the declared parameter list.
    ///
    /// Object params address parameters by name and are permitted only for
    /// operations registered with meaningful parameter names; array params
    /// match by position. Both shapes must supply exactly the declared
    /// count - too few and too many both fail, and any non-empty params
    /// against a zero-parameter operation fails the same way.
    pub fn deserialize(
        &self,
        signature: &OperationSignature,
        request: &JsonRpcRequest,
    ) -> Result<Vec<Value>, ParameterError> {
        let declared = signature.arity();
        // A zero-parameter operation accepts absent or empty params and
        // nothing else, regardless of shape.
        if declared == 0 {
            return match &request.params {
                None => Ok(Vec::new()),
                Some(params) if params.is_empty() => Ok(Vec::new()),
                Some(params) => Err(ParameterError::CountMismatch {
                    expected: 0,
                    actual: params.len(),
                }),
            };
        }
        match &request.params {
            None => Err(ParameterError::CountMismatch {
                expected: declared,
                actual: 0,
            }),
            Some(RequestParams::Object(map)) => {
                if !signature.named_params {
                    return Err(ParameterError::NamedParamsUnsupported(
                        signature.method.clone(),
                    ));
                }
                if map.len() != declared {
                    return Err(ParameterError::CountMismatch {
                        expected: declared,
                        actual: map.len(),
                    });
                }
                signature
                    .params
                    .iter()
                    .map(|param| {
                        // A missing name feeds null into the converter,
                        // which may reject it as a type mismatch.
                        let node = map.get(&param.name).cloned().unwrap_or(Value::Null);
                        self.convert(signature, &param.name, &node, &param.kind)
                    })
                    .collect()
            }
            Some(RequestParams::Array(items)) => {
                if items.len() != declared {
                    return Err(ParameterError::CountMismatch {
                        expected: declared,
                        actual: items.len(),
                    });
                }
                signature
                    .params
                    .iter()
                    .zip(items)
                    .map(|(param, node)| self.convert(signature, &param.name, node, &param.kind))
                    .collect()
            }
        }
    }

    fn convert(
        &self,
        signature: &OperationSignature,
        param: &str,
        node: &Value,
        expect: &TypeHint,
    ) -> Result<Value, ParameterError> {
        self.converter.to_value(node, expect).map_err(|e| {
            if e.is_mismatch() {
                ParameterError::TypeMismatch {
                    method: signature.method.clone(),
                    param: param.to_string(),
                    source: e,
                }
            } else {
                ParameterError::Convert(e)
            }
        })
    }
}

impl Default for ParameterDeserializer {
    fn default() -> Self {
        Self::new(Arc::new(StrictConverter))
    }
}

/// Client-side half of the parameter codec: turns call arguments into a
/// `params` node.
pub struct ParameterSerializer {
    converter: Arc<dyn TypeConverter>,
    named_params: bool,
}

impl ParameterSerializer {
    pub fn new(converter: Arc<dyn TypeConverter>) -> Self {
        Self {
            converter,
            named_params: false,
        }
    }

    /// Enable named-parameter emission for operations whose signatures
    /// allow it.
    pub fn with_named_params(mut self, named_params: bool) -> Self {
        self.named_params = named_params;
        self
    }

    /// Serialize call arguments, optionally guided by the target
    /// operation's signature.
    ///
    /// With a signature and named mode on, operations registered with
    /// meaningful parameter names get an object keyed by those names;
    /// otherwise the arguments are emitted positionally, converted against
    /// the declared hints. Without a signature (an ad hoc call by method
    /// name only) the arguments always form a positional array, each
    /// checked against its own runtime shape. Empty argument lists emit no
    /// params node at all.
    pub fn serialize(
        &self,
        signature: Option<&OperationSignature>,
        args: &[Value],
    ) -> Result<Option<RequestParams>, ParameterError> {
        if args.is_empty() {
            return Ok(None);
        }
        match signature {
            Some(signature) => {
                if args.len() != signature.arity() {
                    return Err(ParameterError::CountMismatch {
                        expected: signature.arity(),
                        actual: args.len(),
                    });
                }
                if self.named_params && signature.named_params {
                    let mut map = Map::new();
                    for (param, value) in signature.params.iter().zip(args) {
                        let node = self.convert(signature, &param.name, value, &param.kind)?;
                        map.insert(param.name.clone(), node);
                    }
                    Ok(Some(RequestParams::Object(map)))
                } else {
                    let items = signature
                        .params
                        .iter()
                        .zip(args)
                        .map(|(param, value)| {
                            self.convert(signature, &param.name, value, &param.kind)
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Some(RequestParams::Array(items)))
                }
            }
            None => {
                let items = args
                    .iter()
                    .map(|value| {
                        self.converter
                            .to_node(value.clone(), &TypeHint::of(value))
                            .map_err(ParameterError::Convert)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(RequestParams::Array(items)))
            }
        }
    }

    fn convert(
        &self,
        signature: &OperationSignature,
        param: &str,
        value: &Value,
        expect: &TypeHint,
    ) -> Result<Value, ParameterError> {
        self.converter.to_node(value.clone(), expect).map_err(|e| {
            if e.is_mismatch() {
                ParameterError::TypeMismatch {
                    method: signature.method.clone(),
                    param: param.to_string(),
                    source: e,
                }
            } else {
                ParameterError::Convert(e)
            }
        })
    }
}

impl Default for ParameterSerializer {
    fn default() -> Self {
        Self::new(Arc::new(StrictConverter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;
    use serde_json::json;

    fn plus_signature() -> OperationSignature {
        OperationSignature::new("plus")
            .param("n1", TypeHint::Integer)
            .param("n2", TypeHint::Integer)
            .named_params(true)
            .returns(TypeHint::Integer)
    }

    fn positional_signature() -> OperationSignature {
        OperationSignature::new("concat")
            .param("arg0", TypeHint::String)
            .param("arg1", TypeHint::Integer)
            .returns(TypeHint::String)
    }

    #[test]
    fn test_positional_deserialization() {
        let request = JsonRpcRequest::with_array_params(
            "plus",
            vec![json!(42), json!(23)],
            RequestId::from("req1"),
        );
        let args = ParameterDeserializer::default()
            .deserialize(&plus_signature(), &request)
            .unwrap();
        assert_eq!(args, vec![json!(42), json!(23)]);
    }

    #[test]
    fn test_named_deserialization() {
        let mut params = Map::new();
        params.insert("n1".to_string(), json!(42));
        params.insert("n2".to_string(), json!(23));
        let request =
            JsonRpcRequest::with_object_params("plus", params, RequestId::from("req1"));

        let args = ParameterDeserializer::default()
            .deserialize(&plus_signature(), &request)
            .unwrap();
        assert_eq!(args, vec![json!(42), json!(23)]);
    }

    #[test]
    fn test_named_params_rejected_without_meaningful_names() {
        let mut params = Map::new();
        params.insert("arg0".to_string(), json!("Test"));
        params.insert("arg1".to_string(), json!(123));
        let request =
            JsonRpcRequest::with_object_params("concat", params, RequestId::from("req1"));

        let err = ParameterDeserializer::default()
            .deserialize(&positional_signature(), &request)
            .unwrap_err();
        assert!(matches!(err, ParameterError::NamedParamsUnsupported(_)));
        assert!(!err.is_mismatch());
    }

    #[test]
    fn test_count_mismatch_both_directions() {
        let too_few =
            JsonRpcRequest::with_array_params("plus", vec![json!(42)], RequestId::from("r"));
        let too_many = JsonRpcRequest::with_array_params(
            "plus",
            vec![json!(1), json!(2), json!(3)],
            RequestId::from("r"),
        );

        let codec = ParameterDeserializer::default();
        for request in [too_few, too_many] {
            let err = codec.deserialize(&plus_signature(), &request).unwrap_err();
            assert!(
                matches!(err, ParameterError::CountMismatch { .. }),
                "expected a count mismatch, got {err:?}"
            );
        }
    }

    #[test]
    fn test_named_count_mismatch() {
        let mut params = Map::new();
        params.insert("n1".to_string(), json!(42));
        let request = JsonRpcRequest::with_object_params("plus", params, RequestId::from("r"));

        let err = ParameterDeserializer::default()
            .deserialize(&plus_signature(), &request)
            .unwrap_err();
        assert!(matches!(
            err,
            ParameterError::CountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_missing_params_against_declared() {
        let request = JsonRpcRequest::new("plus", None, RequestId::from("r"));
        let err = ParameterDeserializer::default()
            .deserialize(&plus_signature(), &request)
            .unwrap_err();
        assert!(matches!(
            err,
            ParameterError::CountMismatch {
                expected: 2,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_zero_declared_with_empty_params() {
        let signature = OperationSignature::new("nop");
        let codec = ParameterDeserializer::default();

        let absent = JsonRpcRequest::new("nop", None, RequestId::from("r"));
        assert!(codec.deserialize(&signature, &absent).unwrap().is_empty());

        let empty_array = JsonRpcRequest::with_array_params("nop", vec![], RequestId::from("r"));
        assert!(
            codec
                .deserialize(&signature, &empty_array)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_zero_declared_with_supplied_params() {
        // Non-empty params against a zero-parameter operation are a count
        // mismatch even when the operation would reject named params.
        let signature = OperationSignature::new("nop");
        let codec = ParameterDeserializer::default();

        let array =
            JsonRpcRequest::with_array_params("nop", vec![json!(1)], RequestId::from("r"));
        assert!(codec.deserialize(&signature, &array).unwrap_err().is_mismatch());

        let mut params = Map::new();
        params.insert("x".to_string(), json!(1));
        let object = JsonRpcRequest::with_object_params("nop", params, RequestId::from("r"));
        assert!(
            codec
                .deserialize(&signature, &object)
                .unwrap_err()
                .is_mismatch()
        );
    }

    #[test]
    fn test_type_mismatch_is_distinguished() {
        let request = JsonRpcRequest::with_array_params(
            "plus",
            vec![json!("42"), json!(23)],
            RequestId::from("r"),
        );
        let err = ParameterDeserializer::default()
            .deserialize(&plus_signature(), &request)
            .unwrap_err();
        assert!(matches!(err, ParameterError::TypeMismatch { .. }));
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_missing_named_value_feeds_null() {
        let mut params = Map::new();
        params.insert("n1".to_string(), json!(42));
        params.insert("wrong".to_string(), json!(23));
        let request = JsonRpcRequest::with_object_params("plus", params, RequestId::from("r"));

        let err = ParameterDeserializer::default()
            .deserialize(&plus_signature(), &request)
            .unwrap_err();
        assert!(matches!(err, ParameterError::TypeMismatch { .. }));
    }

    #[test]
    fn test_serialize_named() {
        let serializer = ParameterSerializer::default().with_named_params(true);
        let params = serializer
            .serialize(Some(&plus_signature()), &[json!(12), json!(67)])
            .unwrap()
            .unwrap();
        match params {
            RequestParams::Object(map) => {
                assert_eq!(map.get("n1"), Some(&json!(12)));
                assert_eq!(map.get("n2"), Some(&json!(67)));
            }
            RequestParams::Array(_) => panic!("expected named params"),
        }
    }

    #[test]
    fn test_serialize_positional_when_names_not_meaningful() {
        let serializer = ParameterSerializer::default().with_named_params(true);
        let params = serializer
            .serialize(Some(&positional_signature()), &[json!("Test"), json!(123)])
            .unwrap()
            .unwrap();
        assert_eq!(params, RequestParams::Array(vec![json!("Test"), json!(123)]));
    }

    #[test]
    fn test_serialize_ad_hoc_is_positional() {
        let serializer = ParameterSerializer::default().with_named_params(true);
        let params = serializer.serialize(None, &[json!(1), json!("x")]).unwrap().unwrap();
        assert_eq!(params, RequestParams::Array(vec![json!(1), json!("x")]));
    }

    #[test]
    fn test_serialize_empty_args_emit_no_params() {
        let serializer = ParameterSerializer::default();
        assert!(serializer.serialize(None, &[]).unwrap().is_none());
    }

    #[test]
    fn test_serialize_type_mismatch() {
        let serializer = ParameterSerializer::default();
        let err = serializer
            .serialize(Some(&plus_signature()), &[json!("x"), json!(2)])
            .unwrap_err();
        assert!(err.is_mismatch());
    }
}
