//! Prime-field arithmetic with a runtime modulus.
//!
//! The constraint file declares which prime a circuit was compiled for, so
//! the modulus is a value carried by [`PrimeField`] rather than a property
//! of the element type. Elements are canonical `BigUint` values in
//! `0 ≤ v < p`; every operation reduces before returning.

pub mod prime;

pub use prime::{PrimeField, BN254_PRIME_LE};
