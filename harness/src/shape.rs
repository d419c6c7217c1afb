//! Output shape descriptors.
//!
//! Callers describe the nested structure they expect to read back from
//! the witness. The dynamic JSON form (integer / one- or two-element
//! array / object) is decided into a closed [`Shape`] variant once at the
//! API boundary; resolution then branches on the tag, never on runtime
//! JSON types.

use serde_json::Value as Json;

use crate::error::HarnessError;

/// Shape of one output signal group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `1` = a single scalar at the prefix itself; `n > 1` = a flat array
    /// of `n` scalars at `prefix[0] .. prefix[n-1]`.
    Count(u64),
    /// Fixed-length array of `count` elements each shaped like the inner
    /// descriptor, at `prefix[i]`.
    Repeat(u64, Box<Shape>),
    /// Struct-like nesting: each field resolved at `prefix.name`.
    Fields(Vec<(String, Shape)>),
}

impl Shape {
    /// A single scalar signal.
    pub const SCALAR: Shape = Shape::Count(1);

    /// Decide a dynamic JSON descriptor into a closed [`Shape`]:
    ///
    /// - positive integer `n` → [`Shape::Count`];
    /// - `[x]` folds to `parse(x)`, so `[n]` is a flat array of `n` scalars;
    /// - `[count, inner]` → [`Shape::Repeat`];
    /// - object → [`Shape::Fields`];
    /// - arrays of length 0 or > 2, zero counts, and any other JSON node
    ///   are rejected with `InvalidShapeDescriptor`.
    pub fn from_json(descriptor: &Json) -> Result<Self, HarnessError> {
        match descriptor {
            Json::Number(n) => {
                let count = n
                    .as_u64()
                    .filter(|&c| c > 0)
                    .ok_or_else(|| invalid(descriptor, "count must be a positive integer"))?;
                Ok(Shape::Count(count))
            }
            Json::Array(items) => match items.as_slice() {
                [inner] => Self::from_json(inner),
                [count, inner] => {
                    let count = count
                        .as_u64()
                        .ok_or_else(|| invalid(descriptor, "array length must be an integer"))?;
                    Ok(Shape::Repeat(count, Box::new(Self::from_json(inner)?)))
                }
                _ => Err(invalid(descriptor, "array form takes 1 or 2 elements")),
            },
            Json::Object(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, inner)| Ok((name.clone(), Self::from_json(inner)?)))
                    .collect::<Result<Vec<_>, HarnessError>>()?;
                Ok(Shape::Fields(fields))
            }
            other => Err(invalid(other, "expected integer, array, or object")),
        }
    }
}

fn invalid(descriptor: &Json, reason: &str) -> HarnessError {
    HarnessError::InvalidShapeDescriptor(format!("{descriptor} ({reason})"))
}

// ============================================================================
// Tests
// ============================================================================
