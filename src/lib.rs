//! Decoder and query engine for two-section, bit-packed DAWG word lists.
//!
//! A dictionary file holds the same lexicon twice: Section 1 stores words
//! reversed and is entered through a 26-entry letter index keyed by the last
//! letter; Section 2 stores words forward and has no index. [`QueryEngine`]
//! accepts a word when either section does and enumerates the union.
//!
//! ```
//! use dawglex::{DawgBuilder, DawgConfig, DawgFile, QueryEngine};
//!
//! let bytes = DawgBuilder::new().words(["aa", "qi", "aardvark"]).unwrap().build().unwrap();
//! let file = DawgFile::from_bytes(bytes, DawgConfig::default()).unwrap();
//! let engine = QueryEngine::new(&file);
//! assert!(engine.validate("aardvark"));
//! assert!(!engine.validate("zzzzz"));
//! ```
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod bench_utils;
pub mod builder;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crossval;
pub mod errors;
pub mod file;
pub mod format;
pub mod node_store;
pub mod prefix;
pub mod query;
pub mod suffix;
pub mod word;

pub use crate::builder::DawgBuilder;
pub use crate::config::{ChainPolicy, DawgConfig};
pub use crate::crossval::{CrossReport, CrossValidationOptions, Lexicon, cross_validate};
pub use crate::errors::{DawgError, TraversalFault};
pub use crate::file::{DawgFile, Section};
pub use crate::format::{DawgHeader, LetterIndex, Node, NodeEncoding};
pub use crate::node_store::{NodeStore, SiblingChain};
pub use crate::prefix::{FirstLetterTable, PrefixEngine};
pub use crate::query::{QueryEngine, Verdict, Words};
pub use crate::suffix::SuffixEngine;
pub use crate::word::LetterPath;
