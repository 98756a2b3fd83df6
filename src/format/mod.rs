//! Bit-level layout of dictionary files.
//!
//! ```text
//! 0x00  u32 section1_end
//! 0x04  u32 section2_end
//! 0x08  u32 reserved boundary
//! 0x0C  u32 reserved count
//! 0x10  26 x u32 letter index (low 16 bits = chain start)
//! base  N x u32 node records
//! ```

pub mod constants;
pub mod header;
pub mod letter_index;
pub mod node;

pub use header::{DawgHeader, decode_header, encode_header};
pub use letter_index::LetterIndex;
pub use node::{Node, NodeEncoding};
