//! Constants for the on-disk dictionary layout.
//!
//! All multi-byte fields are big-endian.

/// Header size in bytes (four u32 fields)
pub const HEADER_SIZE: usize = 16;

/// Header field offsets
pub mod header_offset {
    pub const SECTION1_END: usize = 0x00;
    pub const SECTION2_END: usize = 0x04;
    pub const RESERVED_BOUNDARY: usize = 0x08;
    pub const RESERVED_COUNT: usize = 0x0C;
}

/// Letter index table
pub mod letter_index {
    pub const OFFSET: usize = 0x10;
    pub const ENTRIES: usize = 26;
    pub const RECORD_SIZE: usize = 4;
    pub const END: usize = OFFSET + ENTRIES * RECORD_SIZE;
    /// Only the low half of each record is the start index.
    pub const START_MASK: u32 = 0xFFFF;
}

/// Node array base offset for the current file revision
pub const DEFAULT_NODE_BASE: u32 = letter_index::END as u32;

/// Size of one node record
pub const NODE_SIZE: usize = 4;

/// Width of a packed child index
pub const CHILD_BITS: u32 = 22;
pub const MAX_CHILD_INDEX: u32 = (1 << CHILD_BITS) - 1;

/// Single 32-bit word: letter | end | last | child
pub mod packed {
    pub const LETTER_SHIFT: u32 = 24;
    pub const END_OF_ENTRY: u32 = 1 << 23;
    pub const LAST_SIBLING: u32 = 1 << 22;
    pub const CHILD_MASK: u32 = super::MAX_CHILD_INDEX;
}

/// Four byte fields: ptr_hi, ptr_lo, flags, letter; child = ptr + (flags & CHILD_MASK)
pub mod split {
    pub const END_OF_ENTRY: u8 = 0x80;
    pub const LAST_SIBLING: u8 = 0x40;
    pub const CHILD_MASK: u8 = 0x3F;
    pub const MAX_PTR: u32 = u16::MAX as u32;
    pub const MAX_CHILD_INDEX: u32 = MAX_PTR + CHILD_MASK as u32;
}

/// Traversal guards
pub const DEFAULT_MAX_DEPTH: usize = 20;
pub const DEFAULT_MAX_CHAIN_LEN: usize = 64;

/// Shortest string accepted as a word
pub const MIN_WORD_LEN: usize = 2;
