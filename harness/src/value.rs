//! Reconstructed output values.

use num_bigint::BigUint;
use serde_json::Value as Json;

/// A nested output value read back from the witness: scalars mirror the
/// ordering and nesting of the [`crate::Shape`] that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(BigUint),
    Array(Vec<Value>),
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// JSON rendering with scalars as canonical decimal strings. Field
    /// values routinely exceed every JSON number type, so strings are the
    /// only faithful encoding.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Scalar(v) => Json::String(v.to_str_radix(10)),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Struct(fields) => fields
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect::<serde_json::Map<_, _>>()
                .into(),
        }
    }

    /// The scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&BigUint> {
        match self {
            Value::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_nesting() {
        let value = Value::Struct(vec![
            (
                "a".into(),
                Value::Array(vec![
                    Value::Scalar(BigUint::from(1u32)),
                    Value::Scalar(BigUint::from(2u32)),
                ]),
            ),
            ("b".into(), Value::Scalar(BigUint::from(42u32))),
        ]);
        assert_eq!(value.to_json(), json!({"a": ["1", "2"], "b": "42"}));
    }
}
