//! Modular arithmetic over a runtime prime.
//!
//! Canonical form: every element handed out by these methods satisfies
//! `0 ≤ v < p`. Inputs to `add`/`sub`/`mul`/`neg` are expected to already be
//! canonical; values from outside (witness entries, parsed strings, raw
//! bytes) go through one of the `element`/`from_*` constructors first.

use num_bigint::BigUint;
use num_traits::Zero;

/// BN254 scalar field prime in 32-byte little-endian form.
/// p = 21888242871839275222246405745257275088548364400416034343698204186575808495617
pub const BN254_PRIME_LE: [u8; 32] = {
    let l0: u64 = 0x43e1f593f0000001;
    let l1: u64 = 0x2833e84879b97091;
    let l2: u64 = 0xb85045b68181585d;
    let l3: u64 = 0x30644e72e131a029;
    let b0 = l0.to_le_bytes();
    let b1 = l1.to_le_bytes();
    let b2 = l2.to_le_bytes();
    let b3 = l3.to_le_bytes();
    [
        b0[0], b0[1], b0[2], b0[3], b0[4], b0[5], b0[6], b0[7],
        b1[0], b1[1], b1[2], b1[3], b1[4], b1[5], b1[6], b1[7],
        b2[0], b2[1], b2[2], b2[3], b2[4], b2[5], b2[6], b2[7],
        b3[0], b3[1], b3[2], b3[3], b3[4], b3[5], b3[6], b3[7],
    ]
};

/// A prime field `F_p` with the modulus chosen at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    prime: BigUint,
}

impl PrimeField {
    /// Create a field with the given modulus.
    ///
    /// The modulus must be at least 2; primality is the caller's
    /// responsibility (it comes from a compiler artifact, not user input).
    pub fn new(prime: BigUint) -> Self {
        debug_assert!(prime >= BigUint::from(2u32));
        Self { prime }
    }

    /// The BN254 scalar field, the default prime of the circom toolchain.
    pub fn bn254() -> Self {
        Self::new(BigUint::from_bytes_le(&BN254_PRIME_LE))
    }

    /// The modulus `p`.
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// Canonicalize an arbitrary non-negative integer: `v mod p`.
    pub fn element(&self, v: &BigUint) -> BigUint {
        v % &self.prime
    }

    /// Canonical element from a machine integer.
    pub fn from_u64(&self, v: u64) -> BigUint {
        BigUint::from(v) % &self.prime
    }

    /// Canonical element from little-endian bytes (the encoding the binary
    /// artifact formats use for coefficients and witness values).
    pub fn from_le_bytes(&self, bytes: &[u8]) -> BigUint {
        BigUint::from_bytes_le(bytes) % &self.prime
    }

    /// Parse a decimal string, reduced mod `p`. A leading `-` maps to the
    /// additive inverse, so `"-1"` is `p - 1`. Returns `None` on anything
    /// that is not an optionally-signed run of digits.
    pub fn from_decimal_str(&self, s: &str) -> Option<BigUint> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let v = BigUint::parse_bytes(digits.as_bytes(), 10)? % &self.prime;
        Some(if negative { self.neg(&v) } else { v })
    }

    /// Modular addition: `(a + b) mod p`.
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.prime
    }

    /// Modular subtraction: `(a - b) mod p`. `b` must be canonical.
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        ((a + &self.prime) - b) % &self.prime
    }

    /// Modular multiplication: `(a * b) mod p`.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.prime
    }

    /// Additive inverse: `(-a) mod p`. `a` must be canonical.
    pub fn neg(&self, a: &BigUint) -> BigUint {
        if a.is_zero() {
            BigUint::zero()
        } else {
            &self.prime - a
        }
    }

    /// Zero test on a canonical element.
    pub fn is_zero(&self, a: &BigUint) -> bool {
        a.is_zero()
    }
}

// ============================================================================
// Tests
// ============================================================================
