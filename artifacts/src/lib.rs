//! Circuit artifact loaders.
//!
//! A compiled circuit leaves three files behind: a `.sym` symbol listing
//! mapping signal names to witness positions, a `.r1cs` constraint file
//! (iden3 binary format, version 1), and optionally a `.wtns` witness file
//! (iden3 binary format, version 2) written by an external witness
//! generator. This crate parses all three into plain data; interpreting
//! them against a witness is the harness crate's job.

pub mod r1cs;
pub mod sym;
pub mod wtns;

pub use r1cs::{Constraint, LinearCombination, R1csError, R1csFile};
pub use sym::{SymError, SymbolEntry, SymbolTable};
pub use wtns::{WtnsError, WtnsFile};
