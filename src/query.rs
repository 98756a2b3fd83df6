//! Unified lookup and enumeration over both sections.
//!
//! A word is valid when either section accepts it. Neither section is a
//! superset of the other, so both are always consulted.

use std::ops::Range;

use ahash::AHashSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ChainPolicy;
use crate::errors::TraversalFault;
use crate::file::{DawgFile, Section};
use crate::format::constants::MIN_WORD_LEN;
use crate::node_store::{NodeStore, SiblingChain};
use crate::prefix::PrefixEngine;
use crate::suffix::SuffixEngine;
use crate::word::normalize;

/// Which sections accepted a word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub section1: bool,
    pub section2: bool,
}

impl Verdict {
    pub fn is_word(&self) -> bool {
        self.section1 || self.section2
    }

    pub fn label(&self) -> &'static str {
        match (self.section1, self.section2) {
            (true, true) => "both",
            (true, false) => "section1",
            (false, true) => "section2",
            (false, false) => "none",
        }
    }
}

pub struct QueryEngine<'a> {
    file: &'a DawgFile,
    suffix: SuffixEngine<'a>,
    prefix: PrefixEngine<'a>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(file: &'a DawgFile) -> Self {
        Self {
            file,
            suffix: SuffixEngine::new(file),
            prefix: PrefixEngine::new(file),
        }
    }

    pub fn file(&self) -> &'a DawgFile {
        self.file
    }

    pub fn suffix(&self) -> &SuffixEngine<'a> {
        &self.suffix
    }

    pub fn prefix(&self) -> &PrefixEngine<'a> {
        &self.prefix
    }

    pub fn validate(&self, word: &str) -> bool {
        self.check(word).is_word()
    }

    pub fn check(&self, word: &str) -> Verdict {
        match normalize(word) {
            Some(bytes) => Verdict {
                section1: self.suffix.accepts(&bytes),
                section2: self.prefix.accepts(&bytes),
            },
            None => Verdict::default(),
        }
    }

    /// Every word in both sections, each yielded once.
    ///
    /// Enumeration follows sibling chains strictly whatever the configured
    /// [`ChainPolicy`]: words that only an open-range lookup reaches are
    /// accepted by [`validate`](Self::validate) but never enumerated.
    pub fn enumerate(&self) -> Words<'a> {
        self.enumerate_sections(&Section::BOTH)
    }

    pub fn enumerate_section(&self, section: Section) -> Words<'a> {
        self.enumerate_sections(&[section])
    }

    pub fn enumerate_sections(&self, sections: &[Section]) -> Words<'a> {
        self.warn_open_range();
        Words::new(self.file.store(), self.roots(sections), self.file.config().max_depth)
    }

    /// Parallel enumeration, one task per root chain; the merged result is
    /// sorted and deduplicated.
    pub fn par_enumerate(&self, sections: &[Section]) -> Vec<String> {
        self.warn_open_range();
        let store = self.file.store();
        let max_depth = self.file.config().max_depth;
        let mut words: Vec<String> = self
            .roots(sections)
            .into_par_iter()
            .flat_map_iter(|root| Words::new(store, vec![root], max_depth))
            .collect();
        words.par_sort_unstable();
        words.dedup();
        words
    }

    fn warn_open_range(&self) {
        if self.file.config().chain_policy == ChainPolicy::OpenRange {
            warn!("enumeration walks strict chains; open-range matches are not listed");
        }
    }

    fn roots(&self, sections: &[Section]) -> Vec<Root> {
        let mut roots = Vec::new();
        for &section in sections {
            let range = self.file.section_range(section);
            match section {
                Section::Suffix => {
                    for (letter, start) in self.file.letter_index().iter() {
                        roots.push(Root {
                            section,
                            letter,
                            chain: start,
                            range: range.clone(),
                        });
                    }
                }
                Section::Prefix => {
                    for (_, node) in self.prefix.table().all() {
                        if node.has_children() {
                            roots.push(Root {
                                section,
                                letter: node.letter,
                                chain: node.child,
                                range: range.clone(),
                            });
                        }
                    }
                }
            }
        }
        roots
    }
}

/// Entry point of one depth-first walk: the first stored letter and the chain
/// holding the letters that may follow it.
#[derive(Clone, Debug)]
struct Root {
    section: Section,
    letter: u8,
    chain: u32,
    range: Range<u32>,
}

struct Frame<'a> {
    chain: SiblingChain<'a>,
    prefix_len: usize,
}

/// Lazy depth-first enumeration with an explicit stack.
///
/// Paths longer than the configured depth cap are cut off and counted as
/// faults instead of recursing further.
pub struct Words<'a> {
    store: NodeStore<'a>,
    roots: std::vec::IntoIter<Root>,
    current: Option<Root>,
    stack: Vec<Frame<'a>>,
    buf: Vec<u8>,
    seen: AHashSet<String>,
    max_depth: usize,
    faults: usize,
}

impl<'a> Words<'a> {
    fn new(store: NodeStore<'a>, roots: Vec<Root>, max_depth: usize) -> Self {
        Self {
            store,
            roots: roots.into_iter(),
            current: None,
            stack: Vec::new(),
            buf: Vec::with_capacity(max_depth),
            seen: AHashSet::new(),
            max_depth,
            faults: 0,
        }
    }

    /// Anomalies met so far (depth cap, chain cap, out-of-range children).
    pub fn faults(&self) -> usize {
        self.faults
    }

    fn start_next_root(&mut self) -> bool {
        let Some(root) = self.roots.next() else {
            return false;
        };
        self.buf.clear();
        self.buf.push(root.letter);
        self.stack.push(Frame {
            chain: self.store.chain(root.chain, root.range.clone()),
            prefix_len: 1,
        });
        self.current = Some(root);
        true
    }

    fn render(&self) -> String {
        let mut bytes = self.buf.clone();
        if matches!(self.current, Some(Root { section: Section::Suffix, .. })) {
            bytes.reverse();
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn record(&mut self, fault: TraversalFault) {
        if fault.is_anomaly() {
            self.faults += 1;
            debug!(%fault, "enumeration branch abandoned");
        }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                if !self.start_next_root() {
                    return None;
                }
                continue;
            };
            let prefix_len = frame.prefix_len;
            let Some((_, node)) = frame.chain.next() else {
                if let Some(fault) = frame.chain.fault() {
                    self.record(fault);
                }
                self.stack.pop();
                continue;
            };
            self.buf.truncate(prefix_len);
            self.buf.push(node.letter);
            if node.has_children() {
                if self.buf.len() < self.max_depth {
                    let range = self
                        .current
                        .as_ref()
                        .map(|root| root.range.clone())
                        .unwrap_or_default();
                    self.stack.push(Frame {
                        chain: self.store.chain(node.child, range),
                        prefix_len: self.buf.len(),
                    });
                } else {
                    self.record(TraversalFault::DepthExceeded {
                        depth: self.buf.len() + 1,
                        max: self.max_depth,
                    });
                }
            }
            if node.end_of_entry && self.buf.len() >= MIN_WORD_LEN {
                let word = self.render();
                if self.seen.insert(word.clone()) {
                    return Some(word);
                }
            }
        }
    }
}
