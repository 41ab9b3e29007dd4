use std::fmt;

use serde_json::Value;

/// The declared JSON shape of a parameter or return value.
///
/// `Integer` narrows `Number` to values without a fractional part; `Any`
/// accepts every node including null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    Null,
    Bool,
    Integer,
    Number,
    String,
    Array,
    Object,
    Any,
}

impl TypeHint {
    /// The hint matching a node's own runtime shape.
    pub fn of(value: &Value) -> TypeHint {
        match value {
            Value::Null => TypeHint::Null,
            Value::Bool(_) => TypeHint::Bool,
            Value::Number(n) if n.as_i64().is_some() || n.as_u64().is_some() => TypeHint::Integer,
            Value::Number(_) => TypeHint::Number,
            Value::String(_) => TypeHint::String,
            Value::Array(_) => TypeHint::Array,
            Value::Object(_) => TypeHint::Object,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeHint::Null => "null",
            TypeHint::Bool => "boolean",
            TypeHint::Integer => "integer",
            TypeHint::Number => "number",
            TypeHint::String => "string",
            TypeHint::Array => "array",
            TypeHint::Object => "object",
            TypeHint::Any => "any",
        }
    }

    /// Whether a node satisfies this hint.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            TypeHint::Any => true,
            TypeHint::Null => value.is_null(),
            TypeHint::Bool => value.is_boolean(),
            TypeHint::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            TypeHint::Number => value.is_number(),
            TypeHint::String => value.is_string(),
            TypeHint::Array => value.is_array(),
            TypeHint::Object => value.is_object(),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single declared parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: TypeHint,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: TypeHint) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The declared shape of a callable operation: its method name, parameter
/// list, return hint, and whether named parameters may address it.
///
/// `named_params` is supplied at registration time. It stands for "every
/// declared parameter name is meaningful": platforms that strip parameter
/// name metadata generate synthetic positional placeholders, and an
/// object-shaped `params` node must not be matched against those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSignature {
    pub method: String,
    pub params: Vec<ParamSpec>,
    pub named_params: bool,
    pub returns: TypeHint,
}

impl OperationSignature {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
            named_params: false,
            returns: TypeHint::Null,
        }
    }

    pub fn param(mut self, name: impl Into<String>, kind: TypeHint) -> Self {
        self.params.push(ParamSpec::new(name, kind));
        self
    }

    pub fn named_params(mut self, named: bool) -> Self {
        self.named_params = named;
        self
    }

    pub fn returns(mut self, kind: TypeHint) -> Self {
        self.returns = kind;
        self
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
