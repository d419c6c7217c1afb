//! Reader for the iden3 `.wtns` binary format (version 2), the witness
//! file emitted by external witness generators.
//!
//! Same sectioned envelope as `.r1cs`: magic `wtns`, u32 version, u32
//! section count, then `u32 type + u64 length + body` sections. Section 1
//! holds the field size, prime, and value count; section 2 the values as
//! 32-byte little-endian field elements, index-aligned with the symbol
//! listing's `var_index`.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use num_bigint::BigUint;
use thiserror::Error;
use tracing::debug;

const HEADER_SECTION: u32 = 1;
const VALUES_SECTION: u32 = 2;

#[derive(Debug, Error)]
pub enum WtnsError {
    #[error("not a wtns file (bad magic)")]
    InvalidMagic,
    #[error("unsupported wtns version: {0}")]
    UnsupportedVersion(u32),
    #[error("unsupported field size: expected 32 bytes, got {0}")]
    InvalidFieldSize(u32),
    #[error("missing wtns section of type {0}")]
    SectionNotFound(u32),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read witness file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<WtnsError>,
    },
}

/// Parsed contents of a `.wtns` file.
#[derive(Debug, Clone)]
pub struct WtnsFile {
    /// The field modulus the witness values live in.
    pub prime: BigUint,
    /// Witness values in wire order; index 0 is the constant-one wire.
    pub values: Vec<BigUint>,
}

impl WtnsFile {
    /// Read a `.wtns` file from disk, adding path context to any failure.
    pub fn load(path: &Path) -> Result<Self, WtnsError> {
        let wrap = |source: WtnsError| WtnsError::File {
            path: path.to_path_buf(),
            source: Box::new(source),
        };
        let file = File::open(path).map_err(|e| wrap(e.into()))?;
        Self::read(&mut BufReader::new(file)).map_err(wrap)
    }

    /// Parse the format from any seekable reader.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self, WtnsError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != b"wtns" {
            return Err(WtnsError::InvalidMagic);
        }
        let version = reader.read_u32::<LittleEndian>()?;
        if version != 2 {
            return Err(WtnsError::UnsupportedVersion(version));
        }
        let n_sections = reader.read_u32::<LittleEndian>()?;

        let mut sections: Vec<(u32, u64)> = Vec::with_capacity(n_sections as usize);
        for _ in 0..n_sections {
            let sec_type = reader.read_u32::<LittleEndian>()?;
            let sec_size = reader.read_u64::<LittleEndian>()?;
            let body = reader.stream_position()?;
            sections.push((sec_type, body));
            reader.seek(SeekFrom::Start(body + sec_size))?;
        }
        let offset_of = |wanted: u32| {
            sections
                .iter()
                .find(|(sec_type, _)| *sec_type == wanted)
                .map(|&(_, offset)| offset)
                .ok_or(WtnsError::SectionNotFound(wanted))
        };

        // ── Header section ─────────────────────────────────────────────
        reader.seek(SeekFrom::Start(offset_of(HEADER_SECTION)?))?;
        let field_size = reader.read_u32::<LittleEndian>()?;
        if field_size != 32 {
            return Err(WtnsError::InvalidFieldSize(field_size));
        }
        let mut prime_bytes = [0u8; 32];
        reader.read_exact(&mut prime_bytes)?;
        let prime = BigUint::from_bytes_le(&prime_bytes);
        let n_values = reader.read_u32::<LittleEndian>()? as usize;

        // ── Values section ─────────────────────────────────────────────
        reader.seek(SeekFrom::Start(offset_of(VALUES_SECTION)?))?;
        let mut values = Vec::with_capacity(n_values);
        let mut value = [0u8; 32];
        for _ in 0..n_values {
            reader.read_exact(&mut value)?;
            values.push(BigUint::from_bytes_le(&value));
        }

        debug!(values = values.len(), "parsed wtns file");
        Ok(Self { prime, values })
    }
}

// ============================================================================
// Tests
// ============================================================================
