//! Header decoding and validation.
//!
//! The header is four big-endian u32 fields. Only the two section bounds are
//! interpreted; the remaining pair is carried through untouched because its
//! meaning differs between file revisions.

use serde::Serialize;

use crate::errors::DawgError;
use crate::format::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DawgHeader {
    /// First node index not in Section 1 (reversed words)
    pub section1_end: u32,
    /// First node index not in Section 2 (forward words)
    pub section2_end: u32,
    /// Additional boundary, observed but not interpreted
    pub reserved_boundary: u32,
    /// Count field, observed but not interpreted
    pub reserved_count: u32,
}

impl DawgHeader {
    /// Check the section bounds against the node capacity of the file.
    pub fn validate(&self, node_count: u32) -> Result<(), DawgError> {
        if self.section1_end >= self.section2_end {
            return Err(DawgError::malformed_header(format!(
                "section1_end {} must be below section2_end {}",
                self.section1_end, self.section2_end
            )));
        }
        if self.section2_end > node_count {
            return Err(DawgError::malformed_header(format!(
                "section2_end {} exceeds node capacity {}",
                self.section2_end, node_count
            )));
        }
        Ok(())
    }
}

pub fn decode_header(bytes: &[u8]) -> Result<DawgHeader, DawgError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DawgError::malformed_header(format!(
            "file has {} bytes, header needs {}",
            bytes.len(),
            HEADER_SIZE
        )));
    }
    Ok(DawgHeader {
        section1_end: read_u32(bytes, header_offset::SECTION1_END),
        section2_end: read_u32(bytes, header_offset::SECTION2_END),
        reserved_boundary: read_u32(bytes, header_offset::RESERVED_BOUNDARY),
        reserved_count: read_u32(bytes, header_offset::RESERVED_COUNT),
    })
}

pub fn encode_header(header: &DawgHeader) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];
    write_u32(&mut out, header_offset::SECTION1_END, header.section1_end);
    write_u32(&mut out, header_offset::SECTION2_END, header.section2_end);
    write_u32(&mut out, header_offset::RESERVED_BOUNDARY, header.reserved_boundary);
    write_u32(&mut out, header_offset::RESERVED_COUNT, header.reserved_count);
    out
}

/// Caller guarantees `offset + 4 <= bytes.len()`.
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}
