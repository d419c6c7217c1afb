//! Reader for the iden3 `.r1cs` binary format (version 1), as written by
//! the circom compiler and consumed by snarkjs.
//!
//! File layout: magic `r1cs`, u32 version, u32 section count, then
//! sections of `u32 type + u64 byte length + body`. Section order is not
//! fixed and unknown section types are skipped. Section 1 is the header
//! (field size, prime, wire/label/constraint counts); section 2 holds the
//! constraints as triples of sparse linear combinations.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use num_bigint::BigUint;
use thiserror::Error;
use tracing::debug;

const HEADER_SECTION: u32 = 1;
const CONSTRAINT_SECTION: u32 = 2;

#[derive(Debug, Error)]
pub enum R1csError {
    #[error("not an r1cs file (bad magic)")]
    InvalidMagic,
    #[error("unsupported r1cs version: {0}")]
    UnsupportedVersion(u32),
    #[error("unsupported field size: expected 32 bytes, got {0}")]
    InvalidFieldSize(u32),
    #[error("missing r1cs section of type {0}")]
    SectionNotFound(u32),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read constraint file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<R1csError>,
    },
}

/// Sparse linear combination: Σ coefficient_i · witness[index_i].
/// Absent indices imply coefficient zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearCombination {
    pub terms: Vec<(usize, BigUint)>,
}

impl LinearCombination {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A single R1CS constraint: `A · B = C` over the witness vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub a: LinearCombination,
    pub b: LinearCombination,
    pub c: LinearCombination,
}

/// Parsed contents of a `.r1cs` file.
#[derive(Debug, Clone)]
pub struct R1csFile {
    /// The field modulus the circuit was compiled for.
    pub prime: BigUint,
    /// Total number of wires, including the constant-one wire at index 0.
    pub n_wires: usize,
    pub n_pub_out: usize,
    pub n_pub_in: usize,
    pub n_prv_in: usize,
    pub n_labels: u64,
    /// Constraints in file order.
    pub constraints: Vec<Constraint>,
}

impl R1csFile {
    /// Read a `.r1cs` file from disk, adding path context to any failure.
    pub fn load(path: &Path) -> Result<Self, R1csError> {
        let wrap = |source: R1csError| R1csError::File {
            path: path.to_path_buf(),
            source: Box::new(source),
        };
        let file = File::open(path).map_err(|e| wrap(e.into()))?;
        Self::read(&mut BufReader::new(file)).map_err(wrap)
    }

    /// Parse the format from any seekable reader.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self, R1csError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != b"r1cs" {
            return Err(R1csError::InvalidMagic);
        }
        let version = reader.read_u32::<LittleEndian>()?;
        if version != 1 {
            return Err(R1csError::UnsupportedVersion(version));
        }
        let n_sections = reader.read_u32::<LittleEndian>()?;

        // Index the sections first; the header must be interpreted before
        // the constraints regardless of their order in the file.
        let mut sections: Vec<(u32, u64)> = Vec::with_capacity(n_sections as usize);
        for _ in 0..n_sections {
            let sec_type = reader.read_u32::<LittleEndian>()?;
            let sec_size = reader.read_u64::<LittleEndian>()?;
            let body = reader.stream_position()?;
            sections.push((sec_type, body));
            reader.seek(SeekFrom::Start(body + sec_size))?;
        }

        // ── Header section ─────────────────────────────────────────────
        reader.seek(SeekFrom::Start(section_offset(&sections, HEADER_SECTION)?))?;
        let field_size = reader.read_u32::<LittleEndian>()?;
        if field_size != 32 {
            return Err(R1csError::InvalidFieldSize(field_size));
        }
        let mut prime_bytes = [0u8; 32];
        reader.read_exact(&mut prime_bytes)?;
        let prime = BigUint::from_bytes_le(&prime_bytes);
        let n_wires = reader.read_u32::<LittleEndian>()? as usize;
        let n_pub_out = reader.read_u32::<LittleEndian>()? as usize;
        let n_pub_in = reader.read_u32::<LittleEndian>()? as usize;
        let n_prv_in = reader.read_u32::<LittleEndian>()? as usize;
        let n_labels = reader.read_u64::<LittleEndian>()?;
        let n_constraints = reader.read_u32::<LittleEndian>()? as usize;

        // ── Constraint section ─────────────────────────────────────────
        reader.seek(SeekFrom::Start(section_offset(
            &sections,
            CONSTRAINT_SECTION,
        )?))?;
        let mut constraints = Vec::with_capacity(n_constraints);
        for _ in 0..n_constraints {
            let a = read_lc(reader)?;
            let b = read_lc(reader)?;
            let c = read_lc(reader)?;
            constraints.push(Constraint { a, b, c });
        }

        debug!(
            constraints = constraints.len(),
            wires = n_wires,
            "parsed r1cs file"
        );
        Ok(Self {
            prime,
            n_wires,
            n_pub_out,
            n_pub_in,
            n_prv_in,
            n_labels,
            constraints,
        })
    }
}

fn section_offset(sections: &[(u32, u64)], wanted: u32) -> Result<u64, R1csError> {
    sections
        .iter()
        .find(|(sec_type, _)| *sec_type == wanted)
        .map(|&(_, offset)| offset)
        .ok_or(R1csError::SectionNotFound(wanted))
}

fn read_lc<R: Read>(reader: &mut R) -> Result<LinearCombination, R1csError> {
    let n_terms = reader.read_u32::<LittleEndian>()?;
    let mut terms = Vec::with_capacity(n_terms as usize);
    let mut coeff = [0u8; 32];
    for _ in 0..n_terms {
        let wire = reader.read_u32::<LittleEndian>()? as usize;
        reader.read_exact(&mut coeff)?;
        terms.push((wire, BigUint::from_bytes_le(&coeff)));
    }
    Ok(LinearCombination { terms })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_u32(buf: &mut Vec<u8>, v: u32) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(buf: &mut Vec<u8>, v: u64) {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    fn coeff_bytes(v: u64) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&v.to_le_bytes());
        bytes
    }

    fn bn254_prime_le() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        let limbs: [u64; 4] = [
            0x43e1f593f0000001,
            0x2833e84879b97091,
            0xb85045b68181585d,
            0x30644e72e131a029,
        ];
        for (i, limb) in limbs.iter().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
        }
        bytes
    }

    fn header_body(n_wires: u32, n_constraints: u32) -> Vec<u8> {
        let mut body = Vec::new();
        write_u32(&mut body, 32); // field size
        body.extend_from_slice(&bn254_prime_le());
        write_u32(&mut body, n_wires);
        write_u32(&mut body, 1); // n_pub_out
        write_u32(&mut body, 0); // n_pub_in
        write_u32(&mut body, n_wires.saturating_sub(2)); // n_prv_in
        write_u64(&mut body, n_wires as u64); // n_labels
        write_u32(&mut body, n_constraints);
        body
    }

    /// A single a*b=c constraint over wires [ONE, c, a, b]:
    /// A = {2: 1}, B = {3: 1}, C = {1: 1}.
    fn mul_constraint_body() -> Vec<u8> {
        let mut body = Vec::new();
        for wire in [2u32, 3, 1] {
            write_u32(&mut body, 1); // one term
            write_u32(&mut body, wire);
            body.extend_from_slice(&coeff_bytes(1));
        }
        body
    }

    fn section(buf: &mut Vec<u8>, sec_type: u32, body: &[u8]) {
        write_u32(buf, sec_type);
        write_u64(buf, body.len() as u64);
        buf.extend_from_slice(body);
    }

    fn mul_circuit_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"r1cs");
        write_u32(&mut buf, 1); // version
        write_u32(&mut buf, 3); // n_sections
        section(&mut buf, 1, &header_body(4, 1));
        section(&mut buf, 2, &mul_constraint_body());
        // Wire2Label section, skipped by the reader
        let mut w2l = Vec::new();
        for i in 0..4u64 {
            write_u64(&mut w2l, i);
        }
        section(&mut buf, 3, &w2l);
        buf
    }

    #[test]
    fn test_read_mul_circuit() {
        let data = mul_circuit_bytes();
        let r1cs = R1csFile::read(&mut Cursor::new(data)).unwrap();

        assert_eq!(
            r1cs.prime.to_str_radix(10),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
        assert_eq!(r1cs.n_wires, 4);
        assert_eq!(r1cs.n_pub_out, 1);
        assert_eq!(r1cs.n_prv_in, 2);
        assert_eq!(r1cs.n_labels, 4);
        assert_eq!(r1cs.constraints.len(), 1);

        let c = &r1cs.constraints[0];
        assert_eq!(c.a.terms, vec![(2, BigUint::from(1u32))]);
        assert_eq!(c.b.terms, vec![(3, BigUint::from(1u32))]);
        assert_eq!(c.c.terms, vec![(1, BigUint::from(1u32))]);
    }

    #[test]
    fn test_sections_in_any_order() {
        // Constraints before the header must still parse.
        let mut buf = Vec::new();
        buf.extend_from_slice(b"r1cs");
        write_u32(&mut buf, 1);
        write_u32(&mut buf, 2);
        section(&mut buf, 2, &mul_constraint_body());
        section(&mut buf, 1, &header_body(4, 1));

        let r1cs = R1csFile::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(r1cs.constraints.len(), 1);
        assert_eq!(r1cs.constraints[0].a.terms[0].0, 2);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = mul_circuit_bytes();
        data[0] = b'x';
        let err = R1csFile::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, R1csError::InvalidMagic));
    }

    #[test]
    fn test_bad_version() {
        let mut data = mul_circuit_bytes();
        data[4..8].copy_from_slice(&9u32.to_le_bytes());
        let err = R1csFile::read(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, R1csError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_bad_field_size() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"r1cs");
        write_u32(&mut buf, 1);
        write_u32(&mut buf, 1);
        let mut body = header_body(4, 0);
        body[0..4].copy_from_slice(&8u32.to_le_bytes());
        section(&mut buf, 1, &body);
        let err = R1csFile::read(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, R1csError::InvalidFieldSize(8)));
    }

    #[test]
    fn test_missing_constraint_section() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"r1cs");
        write_u32(&mut buf, 1);
        write_u32(&mut buf, 1);
        section(&mut buf, 1, &header_body(4, 1));
        let err = R1csFile::read(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, R1csError::SectionNotFound(2)));
    }

    #[test]
    fn test_empty_lcs() {
        // A constraint of three empty LCs is representable and trivially zero.
        let mut body = Vec::new();
        for _ in 0..3 {
            write_u32(&mut body, 0);
        }
        let mut buf = Vec::new();
        buf.extend_from_slice(b"r1cs");
        write_u32(&mut buf, 1);
        write_u32(&mut buf, 2);
        section(&mut buf, 1, &header_body(1, 1));
        section(&mut buf, 2, &body);

        let r1cs = R1csFile::read(&mut Cursor::new(buf)).unwrap();
        assert!(r1cs.constraints[0].a.is_empty());
        assert!(r1cs.constraints[0].b.is_empty());
        assert!(r1cs.constraints[0].c.is_empty());
    }

    #[test]
    fn test_load_missing_file_has_path_context() {
        let err = R1csFile::load(Path::new("/nonexistent/circuit.r1cs")).unwrap_err();
        match err {
            R1csError::File { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/circuit.r1cs"))
            }
            other => panic!("expected File error, got {other:?}"),
        }
    }
}
