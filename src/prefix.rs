//! Section 2: forward words with no letter index.
//!
//! First letters are located by scanning the section. A single linear pass
//! splits the section into sibling chains (each ends at a `last_sibling`
//! record or a non-node) and records every child pointer; chains nobody
//! points at are the top-level chains, and their nodes are the first-letter
//! candidates. The result is grouped by letter once per engine.

use std::ops::Range;

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::config::ChainPolicy;
use crate::errors::TraversalFault;
use crate::file::{DawgFile, Section};
use crate::format::Node;
use crate::node_store::NodeStore;
use crate::word::{LetterPath, normalize};

/// First-letter candidates of Section 2, grouped by letter.
#[derive(Clone, Debug, Default)]
pub struct FirstLetterTable {
    roots: AHashMap<u8, Vec<(u32, Node)>>,
    chains: usize,
}

impl FirstLetterTable {
    pub fn build(store: &NodeStore<'_>, range: Range<u32>) -> Self {
        let end = range.end.min(store.len());
        let mut referenced = AHashSet::new();
        for index in range.start..end {
            if let Some(node) = store.get(index) {
                if node.has_children() {
                    referenced.insert(node.child);
                }
            }
        }

        let mut table = FirstLetterTable::default();
        let mut chain_start = range.start;
        for index in range.start..end {
            let Some(node) = store.get(index) else {
                chain_start = index + 1;
                continue;
            };
            if !referenced.contains(&chain_start) {
                if index == chain_start {
                    table.chains += 1;
                }
                table.roots.entry(node.letter).or_default().push((index, node));
            }
            if node.last_sibling {
                chain_start = index + 1;
            }
        }
        debug!(
            chains = table.chains,
            letters = table.roots.len(),
            "built section 2 first-letter table"
        );
        table
    }

    pub fn candidates(&self, letter: u8) -> &[(u32, Node)] {
        self.roots.get(&letter).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every candidate in node index order.
    pub fn all(&self) -> Vec<(u32, Node)> {
        let mut all: Vec<(u32, Node)> = self.roots.values().flatten().copied().collect();
        all.sort_by_key(|(index, _)| *index);
        all
    }

    /// Number of top-level chains found.
    pub fn chain_count(&self) -> usize {
        self.chains
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct PrefixEngine<'a> {
    store: NodeStore<'a>,
    range: Range<u32>,
    policy: ChainPolicy,
    max_depth: usize,
    table: FirstLetterTable,
}

impl<'a> PrefixEngine<'a> {
    pub fn new(file: &'a DawgFile) -> Self {
        let store = file.store();
        let range = file.section_range(Section::Prefix);
        let table = FirstLetterTable::build(&store, range.clone());
        Self {
            store,
            range,
            policy: file.config().chain_policy,
            max_depth: file.config().max_depth,
            table,
        }
    }

    pub fn table(&self) -> &FirstLetterTable {
        &self.table
    }

    pub fn validate(&self, word: &str) -> bool {
        normalize(word).is_some_and(|bytes| self.accepts(&bytes))
    }

    /// `word` must already be normalised.
    pub fn accepts(&self, word: &[u8]) -> bool {
        self.walk(word).is_some()
    }

    pub fn trace(&self, word: &str) -> Option<LetterPath> {
        self.walk(&normalize(word)?)
    }

    fn walk(&self, word: &[u8]) -> Option<LetterPath> {
        if word.len() > self.max_depth {
            let fault = TraversalFault::DepthExceeded {
                depth: word.len(),
                max: self.max_depth,
            };
            debug!(section = 2, %fault, "lookup abandoned");
            return None;
        }
        let (&first, rest) = word.split_first()?;
        if rest.is_empty() {
            return None;
        }
        for &(root_index, root) in self.table.candidates(first) {
            if !root.has_children() {
                continue;
            }
            let mut nodes = Vec::with_capacity(word.len());
            nodes.push(root_index);
            let found = self
                .store
                .follow(root.child, self.range.clone(), rest, self.policy, &mut nodes);
            if found.is_some_and(|node| node.end_of_entry) {
                return Some(LetterPath {
                    section: Section::Prefix,
                    letters: word.to_vec(),
                    nodes,
                });
            }
        }
        None
    }
}
