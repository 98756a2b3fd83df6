//! Node records and the two candidate bit layouts.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::errors::DawgError;
use crate::format::constants::{MAX_CHILD_INDEX, packed, split};

/// One decoded node record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    /// ASCII lowercase letter
    pub letter: u8,
    /// The path ending here spells a word in this section's direction
    pub end_of_entry: bool,
    /// Last node of its sibling chain
    pub last_sibling: bool,
    /// First node of the child chain, 0 when there are no children
    pub child: u32,
}

impl Node {
    pub fn has_children(&self) -> bool {
        self.child != 0
    }
}

/// Bit layout of a four-byte node record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeEncoding {
    /// Letter in the top byte, then end bit, last bit and a 22-bit child.
    #[default]
    Packed,
    /// 16-bit pointer, flag byte (end, last, 6-bit child offset), letter
    /// byte; the child is the pointer plus the offset.
    Split,
}

impl NodeEncoding {
    pub const ALL: [NodeEncoding; 2] = [NodeEncoding::Packed, NodeEncoding::Split];

    /// Decode a raw record, `None` when the letter byte is not `a..=z`.
    pub fn decode(self, raw: u32) -> Option<Node> {
        let node = match self {
            NodeEncoding::Packed => Node {
                letter: (raw >> packed::LETTER_SHIFT) as u8,
                end_of_entry: raw & packed::END_OF_ENTRY != 0,
                last_sibling: raw & packed::LAST_SIBLING != 0,
                child: raw & packed::CHILD_MASK,
            },
            NodeEncoding::Split => {
                let [ptr_hi, ptr_lo, flags, letter] = raw.to_be_bytes();
                let ptr = u16::from_be_bytes([ptr_hi, ptr_lo]) as u32;
                Node {
                    letter,
                    end_of_entry: flags & split::END_OF_ENTRY != 0,
                    last_sibling: flags & split::LAST_SIBLING != 0,
                    child: ptr + (flags & split::CHILD_MASK) as u32,
                }
            }
        };
        node.letter.is_ascii_lowercase().then_some(node)
    }

    pub fn encode(self, node: &Node) -> Result<u32, DawgError> {
        if !node.letter.is_ascii_lowercase() {
            return Err(DawgError::invalid_input(format!(
                "node letter {:#04x} is not a-z",
                node.letter
            )));
        }
        if node.child > self.max_child() {
            return Err(DawgError::CapacityExceeded {
                count: node.child as usize,
                max: self.max_child() as usize,
            });
        }
        let raw = match self {
            NodeEncoding::Packed => {
                let mut raw = (node.letter as u32) << packed::LETTER_SHIFT | node.child;
                if node.end_of_entry {
                    raw |= packed::END_OF_ENTRY;
                }
                if node.last_sibling {
                    raw |= packed::LAST_SIBLING;
                }
                raw
            }
            NodeEncoding::Split => {
                let ptr = node.child.min(split::MAX_PTR);
                let mut flags = (node.child - ptr) as u8;
                if node.end_of_entry {
                    flags |= split::END_OF_ENTRY;
                }
                if node.last_sibling {
                    flags |= split::LAST_SIBLING;
                }
                let [_, _, ptr_hi, ptr_lo] = ptr.to_be_bytes();
                u32::from_be_bytes([ptr_hi, ptr_lo, flags, node.letter])
            }
        };
        Ok(raw)
    }

    /// Largest child index the layout can store.
    pub fn max_child(self) -> u32 {
        match self {
            NodeEncoding::Packed => MAX_CHILD_INDEX,
            NodeEncoding::Split => split::MAX_CHILD_INDEX,
        }
    }
}

impl fmt::Display for NodeEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeEncoding::Packed => write!(f, "packed"),
            NodeEncoding::Split => write!(f, "split"),
        }
    }
}

impl FromStr for NodeEncoding {
    type Err = DawgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "packed" => Ok(NodeEncoding::Packed),
            "split" => Ok(NodeEncoding::Split),
            other => Err(DawgError::invalid_input(format!(
                "unknown node encoding {other} (expected packed or split)"
            ))),
        }
    }
}
