//! The loaded dictionary: bytes, parsed header and letter index.

use std::{fmt, fs, ops::Range, path::Path, str::FromStr};

use serde::Serialize;
use tracing::info;

use crate::config::{ChainPolicy, DawgConfig};
use crate::errors::DawgError;
use crate::format::{
    DawgHeader, LetterIndex, NodeEncoding,
    constants::{NODE_SIZE, letter_index},
    decode_header,
};
use crate::node_store::NodeStore;

/// One of the two independently indexed sub-dictionaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Section 1: words stored reversed, entered through the letter index.
    Suffix,
    /// Section 2: words stored forward, entered by first-letter scan.
    Prefix,
}

impl Section {
    pub const BOTH: [Section; 2] = [Section::Suffix, Section::Prefix];

    pub fn number(self) -> u8 {
        match self {
            Section::Suffix => 1,
            Section::Prefix => 2,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section{}", self.number())
    }
}

impl FromStr for Section {
    type Err = DawgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "suffix" | "section1" => Ok(Section::Suffix),
            "2" | "prefix" | "section2" => Ok(Section::Prefix),
            other => Err(DawgError::invalid_input(format!(
                "unknown section {other} (expected 1 or 2)"
            ))),
        }
    }
}

/// Immutable, fully loaded dictionary file.
///
/// Everything else in the crate borrows from a `DawgFile`; nothing mutates it
/// after construction, so a single instance can be shared across threads.
#[derive(Debug)]
pub struct DawgFile {
    bytes: Vec<u8>,
    header: DawgHeader,
    letter_index: LetterIndex,
    node_count: u32,
    config: DawgConfig,
}

impl DawgFile {
    /// Read the whole file and parse it.
    pub fn open<P: AsRef<Path>>(path: P, config: DawgConfig) -> Result<Self, DawgError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(bytes, config)
    }

    pub fn from_bytes(bytes: Vec<u8>, config: DawgConfig) -> Result<Self, DawgError> {
        config.validate()?;
        let header = decode_header(&bytes)?;
        let node_base = config.node_base as usize;
        if bytes.len() < node_base {
            return Err(DawgError::malformed_header(format!(
                "file has {} bytes, node array starts at {:#x}",
                bytes.len(),
                node_base
            )));
        }
        let node_count = u32::try_from((bytes.len() - node_base) / NODE_SIZE)
            .map_err(|_| DawgError::malformed_header("node array larger than u32 indices"))?;
        header.validate(node_count)?;
        let letter_index = LetterIndex::decode(&bytes, &header)?;
        info!(
            section1_end = header.section1_end,
            section2_end = header.section2_end,
            node_count,
            encoding = %config.encoding,
            "loaded dictionary"
        );
        Ok(Self {
            bytes,
            header,
            letter_index,
            node_count,
            config,
        })
    }

    pub fn header(&self) -> &DawgHeader {
        &self.header
    }

    pub fn letter_index(&self) -> &LetterIndex {
        &self.letter_index
    }

    pub fn config(&self) -> &DawgConfig {
        &self.config
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn store(&self) -> NodeStore<'_> {
        NodeStore::new(
            &self.bytes[self.config.node_base as usize..],
            self.config.encoding,
            self.config.max_chain_len,
        )
    }

    /// Node index range of a section.
    pub fn section_range(&self, section: Section) -> Range<u32> {
        match section {
            Section::Suffix => 0..self.header.section1_end,
            Section::Prefix => self.header.section1_end..self.header.section2_end,
        }
    }

    pub fn summary(&self) -> FileSummary {
        let letter_starts = self
            .letter_index
            .iter()
            .map(|(letter, start)| ((letter as char).to_string(), start))
            .collect();
        FileSummary {
            header: self.header,
            node_base: self.config.node_base,
            node_count: self.node_count,
            encoding: self.config.encoding,
            chain_policy: self.config.chain_policy,
            section1_nodes: self.header.section1_end,
            section2_nodes: self.header.section2_end - self.header.section1_end,
            trailing_nodes: self.node_count - self.header.section2_end,
            letter_index_bytes: letter_index::END - letter_index::OFFSET,
            letter_starts,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FileSummary {
    pub header: DawgHeader,
    pub node_base: u32,
    pub node_count: u32,
    pub encoding: NodeEncoding,
    pub chain_policy: ChainPolicy,
    pub section1_nodes: u32,
    pub section2_nodes: u32,
    pub trailing_nodes: u32,
    pub letter_index_bytes: usize,
    pub letter_starts: Vec<(String, u32)>,
}
