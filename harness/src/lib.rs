//! Witness verification harness for compiled R1CS circuits.
//!
//! A [`CircuitHarness`] owns the compiler artifacts of one compiled
//! circuit (symbol listing + constraint file), loads them lazily, and
//! answers two questions about an externally-produced witness vector:
//! does it satisfy every constraint, and what are the values of the
//! circuit's named, possibly nested/array-shaped output signals.

pub mod error;
pub mod session;
pub mod shape;
pub mod value;

pub use error::HarnessError;
pub use session::{CircuitHarness, ConstraintSet};
pub use shape::Shape;
pub use value::Value;
