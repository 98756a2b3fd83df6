//! Indexed access to node records and sibling-chain iteration.
//!
//! A sibling chain is the run of records starting at some index and ending at
//! the first record flagged `last_sibling`. Iteration additionally stops at a
//! record that does not decode to a letter, at the end of the permitted range,
//! and after `max_chain_len` records.

use std::ops::Range;

use tracing::{debug, trace};

use crate::config::ChainPolicy;
use crate::errors::TraversalFault;
use crate::format::{
    Node, NodeEncoding,
    constants::NODE_SIZE,
    header::read_u32,
};

#[derive(Clone, Copy, Debug)]
pub struct NodeStore<'a> {
    nodes: &'a [u8],
    encoding: NodeEncoding,
    max_chain_len: usize,
}

impl<'a> NodeStore<'a> {
    /// `nodes` starts at node 0; a trailing partial record is ignored.
    pub fn new(nodes: &'a [u8], encoding: NodeEncoding, max_chain_len: usize) -> Self {
        Self {
            nodes,
            encoding,
            max_chain_len,
        }
    }

    pub fn len(&self) -> u32 {
        (self.nodes.len() / NODE_SIZE) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn encoding(&self) -> NodeEncoding {
        self.encoding
    }

    pub fn raw(&self, index: u32) -> Option<u32> {
        if index >= self.len() {
            return None;
        }
        Some(read_u32(self.nodes, index as usize * NODE_SIZE))
    }

    /// `None` both past the end and for records that are not letters.
    pub fn get(&self, index: u32) -> Option<Node> {
        self.lookup(index, self.len()).ok()
    }

    /// Like [`get`](Self::get) but bounded by `limit` and reporting why a
    /// record was refused.
    pub fn lookup(&self, index: u32, limit: u32) -> Result<Node, TraversalFault> {
        let limit = limit.min(self.len());
        if index >= limit {
            return Err(TraversalFault::IndexOutOfRange { index, limit });
        }
        self.raw(index)
            .and_then(|raw| self.encoding.decode(raw))
            .ok_or(TraversalFault::NotANode { index })
    }

    /// Chain starting at `start`, bounded only by the node array.
    pub fn siblings(&self, start: u32) -> SiblingChain<'a> {
        self.chain(start, 0..self.len())
    }

    /// Chain starting at `start`, confined to `range`.
    pub fn chain(&self, start: u32, range: Range<u32>) -> SiblingChain<'a> {
        SiblingChain {
            store: *self,
            start,
            cursor: start,
            end: range.end.min(self.len()),
            floor: range.start,
            yielded: 0,
            done: start == 0,
            fault: None,
        }
    }

    /// Find `letter` in the chain at `start`.
    ///
    /// With [`ChainPolicy::OpenRange`] a miss continues as a linear scan from
    /// the end of the chain up to `range.end`.
    pub fn find(
        &self,
        start: u32,
        range: Range<u32>,
        letter: u8,
        policy: ChainPolicy,
    ) -> Option<(u32, Node)> {
        if start == 0 {
            return None;
        }
        let mut chain = self.chain(start, range.clone());
        if let Some(hit) = chain.by_ref().find(|(_, node)| node.letter == letter) {
            return Some(hit);
        }
        chain.log_fault();
        match policy {
            ChainPolicy::Strict => None,
            ChainPolicy::OpenRange => {
                let from = chain.cursor().max(range.start);
                self.scan(from..range.end, letter).next()
            }
        }
    }

    /// Follow `letters` through successive child chains starting at the chain
    /// `start`, recording each matched node index in `path`.
    ///
    /// Returns the node matched for the final letter; callers decide what its
    /// `end_of_entry` flag means.
    pub fn follow(
        &self,
        start: u32,
        range: Range<u32>,
        letters: &[u8],
        policy: ChainPolicy,
        path: &mut Vec<u32>,
    ) -> Option<Node> {
        let (last, init) = letters.split_last()?;
        let mut chain = start;
        for &letter in init {
            let (index, node) = self.find(chain, range.clone(), letter, policy)?;
            path.push(index);
            if !node.has_children() {
                return None;
            }
            chain = node.child;
        }
        let (index, node) = self.find(chain, range, *last, policy)?;
        path.push(index);
        Some(node)
    }

    /// Every node in `range` carrying `letter`, in index order.
    pub fn scan(self, range: Range<u32>, letter: u8) -> impl Iterator<Item = (u32, Node)> + 'a {
        let end = range.end.min(self.len());
        (range.start..end).filter_map(move |index| {
            self.get(index)
                .filter(|node| node.letter == letter)
                .map(|node| (index, node))
        })
    }
}

/// Lazy, restartable walk over one sibling chain.
#[derive(Clone, Debug)]
pub struct SiblingChain<'a> {
    store: NodeStore<'a>,
    start: u32,
    cursor: u32,
    end: u32,
    floor: u32,
    yielded: usize,
    done: bool,
    fault: Option<TraversalFault>,
}

impl<'a> SiblingChain<'a> {
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Next index the chain would read.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Why the chain stopped early, if it did.
    pub fn fault(&self) -> Option<TraversalFault> {
        self.fault
    }

    pub(crate) fn log_fault(&self) {
        match self.fault {
            Some(fault) if fault.is_anomaly() => {
                debug!(start = self.start, %fault, "sibling chain abandoned");
            }
            Some(fault) => trace!(start = self.start, %fault, "sibling chain terminated"),
            None => {}
        }
    }

    fn stop(&mut self, fault: TraversalFault) -> Option<(u32, Node)> {
        self.done = true;
        self.fault = Some(fault);
        None
    }
}

impl<'a> Iterator for SiblingChain<'a> {
    type Item = (u32, Node);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cursor < self.floor {
            return self.stop(TraversalFault::IndexOutOfRange {
                index: self.cursor,
                limit: self.end,
            });
        }
        if self.yielded >= self.store.max_chain_len {
            return self.stop(TraversalFault::ChainLengthExceeded {
                start: self.start,
                max: self.store.max_chain_len,
            });
        }
        let index = self.cursor;
        let node = match self.store.lookup(index, self.end) {
            Ok(node) => node,
            Err(fault) => return self.stop(fault),
        };
        self.cursor += 1;
        self.yielded += 1;
        if node.last_sibling {
            self.done = true;
        }
        Some((index, node))
    }
}
