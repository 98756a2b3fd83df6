//! Section 1: reversed words entered through the letter index.

use std::ops::Range;

use tracing::debug;

use crate::config::ChainPolicy;
use crate::errors::TraversalFault;
use crate::file::{DawgFile, Section};
use crate::node_store::NodeStore;
use crate::word::{LetterPath, normalize};

#[derive(Clone, Debug)]
pub struct SuffixEngine<'a> {
    file: &'a DawgFile,
    store: NodeStore<'a>,
    range: Range<u32>,
    policy: ChainPolicy,
    max_depth: usize,
}

impl<'a> SuffixEngine<'a> {
    pub fn new(file: &'a DawgFile) -> Self {
        Self {
            file,
            store: file.store(),
            range: file.section_range(Section::Suffix),
            policy: file.config().chain_policy,
            max_depth: file.config().max_depth,
        }
    }

    pub fn validate(&self, word: &str) -> bool {
        normalize(word).is_some_and(|bytes| self.accepts(&bytes))
    }

    /// `word` must already be normalised.
    pub fn accepts(&self, word: &[u8]) -> bool {
        self.walk(word).is_some()
    }

    /// The Section 1 nodes spelling `word`, if Section 1 accepts it.
    pub fn trace(&self, word: &str) -> Option<LetterPath> {
        self.walk(&normalize(word)?)
    }

    fn walk(&self, word: &[u8]) -> Option<LetterPath> {
        if word.len() > self.max_depth {
            let fault = TraversalFault::DepthExceeded {
                depth: word.len(),
                max: self.max_depth,
            };
            debug!(section = 1, %fault, "lookup abandoned");
            return None;
        }
        let reversed: Vec<u8> = word.iter().rev().copied().collect();
        let (&entry, rest) = reversed.split_first()?;
        let start = self.file.letter_index().start(entry)?;
        let mut nodes = Vec::with_capacity(rest.len());
        let last = self
            .store
            .follow(start, self.range.clone(), rest, self.policy, &mut nodes)?;
        last.end_of_entry.then(|| LetterPath {
            section: Section::Suffix,
            letters: reversed,
            nodes,
        })
    }
}
