//! Compiles word lists into the two-section dictionary layout.
//!
//! Each section is built as a trie and minimised by interning sibling chains:
//! two chains with identical `(letter, end_of_entry, child chain)` content are
//! stored once. Chains are laid out breadth-first so the Section 1 chains the
//! letter index points at land at the lowest indices and fit its 16-bit field.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fs,
    path::Path,
};

use ahash::AHashMap;
use tracing::info;

use crate::config::DawgConfig;
use crate::errors::DawgError;
use crate::format::{
    DawgHeader, LetterIndex, Node, NodeEncoding,
    constants::{HEADER_SIZE, letter_index},
    encode_header,
};
use crate::word::normalize;

#[derive(Clone, Debug)]
pub struct DawgBuilder {
    suffix: BTreeSet<Vec<u8>>,
    prefix: BTreeSet<Vec<u8>>,
    encoding: NodeEncoding,
    node_base: u32,
}

impl Default for DawgBuilder {
    fn default() -> Self {
        Self::with_config(&DawgConfig::default())
    }
}

impl DawgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `encoding` and `node_base` affect the output.
    pub fn with_config(config: &DawgConfig) -> Self {
        Self {
            suffix: BTreeSet::new(),
            prefix: BTreeSet::new(),
            encoding: config.encoding,
            node_base: config.node_base,
        }
    }

    /// Add words to both sections.
    pub fn words<I, S>(mut self, words: I) -> Result<Self, DawgError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let bytes = checked(word.as_ref())?;
            self.suffix.insert(bytes.clone());
            self.prefix.insert(bytes);
        }
        Ok(self)
    }

    /// Add words to Section 1 only.
    pub fn suffix_words<I, S>(mut self, words: I) -> Result<Self, DawgError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.suffix.insert(checked(word.as_ref())?);
        }
        Ok(self)
    }

    /// Add words to Section 2 only.
    pub fn prefix_words<I, S>(mut self, words: I) -> Result<Self, DawgError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.prefix.insert(checked(word.as_ref())?);
        }
        Ok(self)
    }

    pub fn build(&self) -> Result<Vec<u8>, DawgError> {
        if self.prefix.is_empty() {
            return Err(DawgError::invalid_input("section 2 needs at least one word"));
        }
        if (self.node_base as usize) < letter_index::END {
            return Err(DawgError::invalid_input(format!(
                "node base {:#x} overlaps the letter index",
                self.node_base
            )));
        }

        // Node 0 is the sentinel: child 0 means "no children".
        let mut nodes = vec![None];

        let mut suffix_trie = TrieNode::default();
        for word in &self.suffix {
            suffix_trie.insert(word.iter().rev().copied());
        }
        let mut suffix_chains = ChainTable::default();
        let entry_chains: Vec<(u8, usize)> = suffix_trie
            .children
            .iter()
            .filter_map(|(&letter, node)| suffix_chains.intern(node).map(|id| (letter, id)))
            .collect();
        let roots: Vec<usize> = entry_chains.iter().map(|(_, id)| *id).collect();
        let positions = suffix_chains.emit(&roots, &mut nodes)?;
        let mut starts = [0u32; letter_index::ENTRIES];
        for (letter, id) in &entry_chains {
            let start = positions[id];
            if start > letter_index::START_MASK {
                return Err(DawgError::CapacityExceeded {
                    count: start as usize,
                    max: letter_index::START_MASK as usize,
                });
            }
            starts[(letter - b'a') as usize] = start;
        }
        let section1_end = nodes.len() as u32;

        let mut prefix_trie = TrieNode::default();
        for word in &self.prefix {
            prefix_trie.insert(word.iter().copied());
        }
        let mut prefix_chains = ChainTable::default();
        let top: Vec<Edge> = prefix_trie
            .children
            .iter()
            .map(|(&letter, node)| Edge {
                letter,
                end: node.terminal,
                child: prefix_chains.intern(node),
            })
            .collect();
        let top_id = prefix_chains.push_unshared(top);
        prefix_chains.emit(&[top_id], &mut nodes)?;
        let section2_end = nodes.len() as u32;

        let distinct: BTreeSet<&Vec<u8>> = self.suffix.iter().chain(self.prefix.iter()).collect();
        let header = DawgHeader {
            section1_end,
            section2_end,
            reserved_boundary: section2_end,
            reserved_count: distinct.len() as u32,
        };

        let mut bytes = Vec::with_capacity(self.node_base as usize + nodes.len() * 4);
        bytes.extend_from_slice(&encode_header(&header));
        debug_assert_eq!(bytes.len(), HEADER_SIZE);
        bytes.extend_from_slice(&LetterIndex::new(starts).encode());
        bytes.resize(self.node_base as usize, 0);
        for node in &nodes {
            let raw = match node {
                Some(node) => self.encoding.encode(node)?,
                None => 0,
            };
            bytes.extend_from_slice(&raw.to_be_bytes());
        }
        info!(
            section1_end,
            section2_end,
            words = distinct.len(),
            encoding = %self.encoding,
            "built dictionary"
        );
        Ok(bytes)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), DawgError> {
        fs::write(path.as_ref(), self.build()?)?;
        Ok(())
    }
}

fn checked(word: &str) -> Result<Vec<u8>, DawgError> {
    normalize(word).ok_or_else(|| {
        DawgError::invalid_input(format!(
            "{word:?} is not a word (needs two or more ASCII letters)"
        ))
    })
}

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<u8, TrieNode>,
    terminal: bool,
}

impl TrieNode {
    fn insert(&mut self, letters: impl Iterator<Item = u8>) {
        let mut node = self;
        for letter in letters {
            node = node.children.entry(letter).or_default();
        }
        node.terminal = true;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Edge {
    letter: u8,
    end: bool,
    child: Option<usize>,
}

#[derive(Debug, Default)]
struct ChainTable {
    chains: Vec<Vec<Edge>>,
    ids: AHashMap<Vec<Edge>, usize>,
}

impl ChainTable {
    /// Chain id for the children of `node`, `None` for a leaf.
    fn intern(&mut self, node: &TrieNode) -> Option<usize> {
        if node.children.is_empty() {
            return None;
        }
        let edges: Vec<Edge> = node
            .children
            .iter()
            .map(|(&letter, child)| Edge {
                letter,
                end: child.terminal,
                child: self.intern(child),
            })
            .collect();
        if let Some(&id) = self.ids.get(&edges) {
            return Some(id);
        }
        let id = self.push_unshared(edges.clone());
        self.ids.insert(edges, id);
        Some(id)
    }

    fn push_unshared(&mut self, edges: Vec<Edge>) -> usize {
        self.chains.push(edges);
        self.chains.len() - 1
    }

    /// Append every chain reachable from `roots` breadth-first and return
    /// the node index each chain id was placed at.
    fn emit(
        &self,
        roots: &[usize],
        nodes: &mut Vec<Option<Node>>,
    ) -> Result<AHashMap<usize, u32>, DawgError> {
        let mut order = Vec::new();
        let mut positions = AHashMap::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut next = nodes.len();
        for &root in roots {
            if !positions.contains_key(&root) {
                positions.insert(root, to_index(next)?);
                next += self.chains[root].len();
                order.push(root);
                queue.push_back(root);
            }
        }
        while let Some(id) = queue.pop_front() {
            for edge in &self.chains[id] {
                if let Some(child) = edge.child {
                    if !positions.contains_key(&child) {
                        positions.insert(child, to_index(next)?);
                        next += self.chains[child].len();
                        order.push(child);
                        queue.push_back(child);
                    }
                }
            }
        }
        for id in order {
            let chain = &self.chains[id];
            for (i, edge) in chain.iter().enumerate() {
                nodes.push(Some(Node {
                    letter: edge.letter,
                    end_of_entry: edge.end,
                    last_sibling: i + 1 == chain.len(),
                    child: edge.child.map(|child| positions[&child]).unwrap_or(0),
                }));
            }
        }
        Ok(positions)
    }
}

fn to_index(position: usize) -> Result<u32, DawgError> {
    u32::try_from(position).map_err(|_| DawgError::CapacityExceeded {
        count: position,
        max: u32::MAX as usize,
    })
}
