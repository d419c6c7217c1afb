use artifacts::{R1csError, SymError};
use thiserror::Error;

/// Everything that can go wrong while checking or inspecting a witness.
///
/// None of these are retried: they are either caller programming errors
/// (bad descriptor, unknown component) or genuine correctness failures
/// (violated constraint, mismatched output) that must halt the calling
/// test with an attributable message.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The shape descriptor named a signal the symbol table doesn't have.
    #[error("output variable not defined: {0}")]
    UndefinedOutputSignal(String),

    /// A malformed shape descriptor (array of length 0 or > 2, zero or
    /// non-integer count, non-descriptor JSON node).
    #[error("invalid output shape descriptor: {0}")]
    InvalidShapeDescriptor(String),

    /// Structural assertion found a leaf whose witness value differs from
    /// the expected literal.
    #[error("assertion failed for {path}: expected {expected}, got {actual}")]
    OutputMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// The first constraint the witness does not satisfy, by ordinal index.
    #[error("constraint {index} not satisfied")]
    ConstraintViolation { index: usize },

    /// A constraint or symbol referenced a witness position past the end of
    /// the supplied vector.
    #[error("witness index {index} out of range (witness has {len} entries)")]
    WitnessIndexOutOfRange { index: usize, len: usize },

    /// No symbol-table key matches the requested sub-component name.
    #[error("no component named `{0}` in the symbol table")]
    UnknownComponent(String),

    #[error(transparent)]
    Sym(#[from] SymError),

    #[error(transparent)]
    R1cs(#[from] R1csError),
}
