//! The 26-entry table of Section 1 chain starts, one per final letter.

use crate::errors::DawgError;
use crate::format::constants::letter_index::*;
use crate::format::header::{DawgHeader, read_u32, write_u32};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterIndex {
    starts: [u32; ENTRIES],
}

impl LetterIndex {
    pub fn new(starts: [u32; ENTRIES]) -> Self {
        Self { starts }
    }

    /// Decode the table and check every start against Section 1.
    ///
    /// The high half of each record is reserved and deliberately ignored.
    pub fn decode(bytes: &[u8], header: &DawgHeader) -> Result<Self, DawgError> {
        if bytes.len() < END {
            return Err(DawgError::malformed_header(format!(
                "file has {} bytes, letter index needs {}",
                bytes.len(),
                END
            )));
        }
        let mut starts = [0u32; ENTRIES];
        for (slot, start) in starts.iter_mut().enumerate() {
            let record = read_u32(bytes, OFFSET + slot * RECORD_SIZE);
            let index = record & START_MASK;
            // 0 marks an empty entry and is valid even when Section 1 is empty.
            if index != 0 && index >= header.section1_end {
                return Err(DawgError::IndexOutOfRange {
                    letter: (b'a' + slot as u8) as char,
                    index,
                    limit: header.section1_end,
                });
            }
            *start = index;
        }
        Ok(Self { starts })
    }

    pub fn encode(&self) -> [u8; ENTRIES * RECORD_SIZE] {
        let mut out = [0u8; ENTRIES * RECORD_SIZE];
        for (slot, start) in self.starts.iter().enumerate() {
            write_u32(&mut out, slot * RECORD_SIZE, *start & START_MASK);
        }
        out
    }

    /// Chain start for words ending in `letter`, `None` when no word does.
    pub fn start(&self, letter: u8) -> Option<u32> {
        if !letter.is_ascii_lowercase() {
            return None;
        }
        match self.starts[(letter - b'a') as usize] {
            0 => None,
            start => Some(start),
        }
    }

    /// `(letter, start)` for every populated entry, in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.starts
            .iter()
            .enumerate()
            .filter(|(_, start)| **start != 0)
            .map(|(slot, start)| (b'a' + slot as u8, *start))
    }

    pub fn raw(&self) -> &[u32; ENTRIES] {
        &self.starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::HEADER_SIZE;

    fn header(section1_end: u32) -> DawgHeader {
        DawgHeader {
            section1_end,
            section2_end: section1_end + 1,
            reserved_boundary: 0,
            reserved_count: 0,
        }
    }

    fn table_bytes(records: &[(usize, u32)]) -> Vec<u8> {
        let mut bytes = vec![0u8; END];
        for &(slot, record) in records {
            write_u32(&mut bytes, OFFSET + slot * RECORD_SIZE, record);
        }
        bytes
    }

    #[test]
    fn test_reserved_high_bits_are_ignored() {
        let bytes = table_bytes(&[(0, 0xBEEF_0005), (25, 0x0001_0007)]);
        let index = LetterIndex::decode(&bytes, &header(10)).unwrap();
        assert_eq!(index.start(b'a'), Some(5));
        assert_eq!(index.start(b'z'), Some(7));
        assert_eq!(index.start(b'm'), None);
    }

    #[test]
    fn test_start_beyond_section1_is_rejected() {
        let bytes = table_bytes(&[(2, 10)]);
        let err = LetterIndex::decode(&bytes, &header(10)).unwrap_err();
        match err {
            DawgError::IndexOutOfRange { letter, index, limit } => {
                assert_eq!(letter, 'c');
                assert_eq!(index, 10);
                assert_eq!(limit, 10);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_empty_entries_pass_with_empty_section1() {
        let bytes = table_bytes(&[(4, 0xFFFF_0000)]);
        let index = LetterIndex::decode(&bytes, &header(0)).unwrap();
        assert_eq!(index.iter().count(), 0);

        let bytes = table_bytes(&[(4, 1)]);
        assert!(LetterIndex::decode(&bytes, &header(0)).is_err());
    }

    #[test]
    fn test_truncated_table_is_malformed() {
        let bytes = vec![0u8; HEADER_SIZE + 8];
        assert!(LetterIndex::decode(&bytes, &header(10)).is_err());
    }

    #[test]
    fn test_encode_places_records_in_letter_order() {
        let mut starts = [0u32; ENTRIES];
        starts[1] = 3;
        let encoded = LetterIndex::new(starts).encode();
        assert_eq!(read_u32(&encoded, RECORD_SIZE), 3);
        assert_eq!(read_u32(&encoded, 0), 0);
    }
}
