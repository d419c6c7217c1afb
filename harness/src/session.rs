//! The per-circuit harness session.
//!
//! A [`CircuitHarness`] points at the output directory of one compiled
//! circuit and lazily loads the `.sym` and `.r1cs` artifacts on first
//! use. Loaded tables are memoized for the lifetime of the session; the
//! `&mut self` loaders make the initialize-once discipline a compile-time
//! guarantee. Witness vectors are only ever read.

use std::path::PathBuf;

use artifacts::{R1csFile, SymbolTable};
use field::PrimeField;
use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::Value as Json;
use tracing::debug;

use crate::error::HarnessError;
use crate::shape::Shape;
use crate::value::Value;

/// A constraint file together with the field its coefficients live in.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pub field: PrimeField,
    pub file: R1csFile,
}

/// Verification session for one compiled circuit.
pub struct CircuitHarness {
    dir: PathBuf,
    base_name: String,
    symbols: Option<SymbolTable>,
    constraints: Option<ConstraintSet>,
}

impl CircuitHarness {
    /// A harness over the compiler output in `dir`, where the artifacts
    /// are named `{base_name}.sym` and `{base_name}.r1cs`.
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            symbols: None,
            constraints: None,
        }
    }

    fn artifact_path(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", self.base_name))
    }

    /// The symbol table, loaded from `{base_name}.sym` on first call.
    pub fn load_symbols(&mut self) -> Result<&SymbolTable, HarnessError> {
        let table = match self.symbols.take() {
            Some(table) => table,
            None => SymbolTable::load(&self.artifact_path("sym"))?,
        };
        Ok(self.symbols.insert(table))
    }

    /// The constraint set and its field, loaded from `{base_name}.r1cs`
    /// on first call.
    pub fn load_constraints(&mut self) -> Result<&ConstraintSet, HarnessError> {
        let set = match self.constraints.take() {
            Some(set) => set,
            None => {
                let file = R1csFile::load(&self.artifact_path("r1cs"))?;
                let field = PrimeField::new(file.prime.clone());
                ConstraintSet { field, file }
            }
        };
        Ok(self.constraints.insert(set))
    }

    // --- Output resolution ---

    /// Reconstruct the main component's outputs according to `shape`.
    pub fn get_output(
        &mut self,
        witness: &[BigUint],
        shape: &Shape,
    ) -> Result<Value, HarnessError> {
        let symbols = self.load_symbols()?;
        resolve_shape(symbols, witness, "main", shape)
    }

    /// Reconstruct the outputs of a named sub-component.
    pub fn get_output_of(
        &mut self,
        witness: &[BigUint],
        shape: &Shape,
        component: &str,
    ) -> Result<Value, HarnessError> {
        let prefix = self.output_prefix(component)?;
        let symbols = self.load_symbols()?;
        resolve_shape(symbols, witness, &prefix, shape)
    }

    /// Map a component name to the signal prefix of its instance: the stem
    /// (key minus its final segment) of the first symbol key in which the
    /// component name appears with no later `.` inside the stem.
    ///
    /// A name that matches nothing is an error; silently falling back to
    /// the `main` scope would resolve against the wrong component.
    pub fn output_prefix(&mut self, component: &str) -> Result<String, HarnessError> {
        if component == "main" {
            return Ok("main".to_string());
        }
        let symbols = self.load_symbols()?;
        for (key, _) in symbols.iter() {
            let Some((stem, _)) = key.rsplit_once('.') else {
                continue;
            };
            // Only the last occurrence can be followed by a dot-free tail.
            if let Some(pos) = stem.rfind(component) {
                if !stem[pos + component.len()..].contains('.') {
                    return Ok(stem.to_string());
                }
            }
        }
        Err(HarnessError::UnknownComponent(component.to_string()))
    }

    /// Walk an expected nested value (objects/arrays/scalar literals) in
    /// lock-step with the witness, comparing each leaf's decimal form.
    /// The first differing leaf aborts with the full dotted/bracketed path.
    pub fn assert_output(
        &mut self,
        witness: &[BigUint],
        expected: &Json,
    ) -> Result<(), HarnessError> {
        let symbols = self.load_symbols()?;
        assert_node(symbols, witness, "main", expected)
    }

    // --- Constraint checking ---

    /// Evaluate every constraint against the witness, in order, failing
    /// fast on the first violation. Witness entries are canonicalized
    /// through the field before use, so unreduced inputs are fine.
    pub fn check_constraints(&mut self, witness: &[BigUint]) -> Result<(), HarnessError> {
        let set = self.load_constraints()?;
        let field = &set.field;
        for (index, constraint) in set.file.constraints.iter().enumerate() {
            let a = eval_lc(field, &constraint.a.terms, witness)?;
            let b = eval_lc(field, &constraint.b.terms, witness)?;
            let c = eval_lc(field, &constraint.c.terms, witness)?;
            if !field.sub(&field.mul(&a, &b), &c).is_zero() {
                return Err(HarnessError::ConstraintViolation { index });
            }
        }
        debug!(
            constraints = set.file.constraints.len(),
            "witness satisfies all constraints"
        );
        Ok(())
    }

    // --- Diagnostics ---

    /// One `name --> value` line per symbol table entry, in declaration
    /// order. Entries addressing past the end of the witness render as
    /// `undefined`.
    pub fn decorated_output(&mut self, witness: &[BigUint]) -> Result<String, HarnessError> {
        let symbols = self.load_symbols()?;
        let lines: Vec<String> = symbols
            .iter()
            .map(|(name, entry)| match witness.get(entry.var_index) {
                Some(value) => format!("{name} --> {value}"),
                None => format!("{name} --> undefined"),
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

// ============================================================================
// Resolution internals
// ============================================================================

fn scalar_at(
    symbols: &SymbolTable,
    witness: &[BigUint],
    name: &str,
) -> Result<BigUint, HarnessError> {
    let entry = symbols
        .get(name)
        .ok_or_else(|| HarnessError::UndefinedOutputSignal(name.to_string()))?;
    witness
        .get(entry.var_index)
        .cloned()
        .ok_or(HarnessError::WitnessIndexOutOfRange {
            index: entry.var_index,
            len: witness.len(),
        })
}

fn resolve_shape(
    symbols: &SymbolTable,
    witness: &[BigUint],
    prefix: &str,
    shape: &Shape,
) -> Result<Value, HarnessError> {
    match shape {
        Shape::Fields(fields) => fields
            .iter()
            .map(|(name, inner)| {
                let value = resolve_shape(symbols, witness, &format!("{prefix}.{name}"), inner)?;
                Ok((name.clone(), value))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Struct),
        Shape::Repeat(count, inner) => (0..*count)
            .map(|i| resolve_shape(symbols, witness, &format!("{prefix}[{i}]"), inner))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Shape::Count(1) => scalar_at(symbols, witness, prefix).map(Value::Scalar),
        Shape::Count(n) => (0..*n)
            .map(|i| scalar_at(symbols, witness, &format!("{prefix}[{i}]")).map(Value::Scalar))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}

fn assert_node(
    symbols: &SymbolTable,
    witness: &[BigUint],
    prefix: &str,
    expected: &Json,
) -> Result<(), HarnessError> {
    match expected {
        Json::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                assert_node(symbols, witness, &format!("{prefix}[{i}]"), item)?;
            }
            Ok(())
        }
        Json::Object(fields) => {
            for (name, item) in fields {
                assert_node(symbols, witness, &format!("{prefix}.{name}"), item)?;
            }
            Ok(())
        }
        leaf => {
            let actual = scalar_at(symbols, witness, prefix)?.to_str_radix(10);
            let expected = match leaf {
                Json::String(s) => s.clone(),
                other => other.to_string(),
            };
            if actual != expected {
                return Err(HarnessError::OutputMismatch {
                    path: prefix.to_string(),
                    expected,
                    actual,
                });
            }
            Ok(())
        }
    }
}

fn eval_lc(
    field: &PrimeField,
    terms: &[(usize, BigUint)],
    witness: &[BigUint],
) -> Result<BigUint, HarnessError> {
    let mut acc = BigUint::zero();
    for (index, coeff) in terms {
        let entry = witness
            .get(*index)
            .ok_or(HarnessError::WitnessIndexOutOfRange {
                index: *index,
                len: witness.len(),
            })?;
        acc = field.add(&acc, &field.mul(coeff, &field.element(entry)));
    }
    Ok(acc)
}

// ============================================================================
// Tests
// ============================================================================
