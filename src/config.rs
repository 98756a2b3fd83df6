//! Load-time and traversal configuration.
//!
//! Every field has a default that matches the current file revision, so
//! `DawgConfig::default()` is enough for files produced by [`crate::builder`].
//!
//! ```rust
//! use dawglex::{ChainPolicy, DawgConfig, NodeEncoding};
//!
//! let cfg = DawgConfig::default()
//!     .with_encoding(NodeEncoding::Split)
//!     .with_chain_policy(ChainPolicy::OpenRange);
//! assert_eq!(cfg.max_depth, 20);
//! ```

use std::{env, fmt, str::FromStr};

use serde::Serialize;

use crate::errors::DawgError;
use crate::format::{
    NodeEncoding,
    constants::{DEFAULT_MAX_CHAIN_LEN, DEFAULT_MAX_DEPTH, DEFAULT_NODE_BASE, letter_index},
};

pub const ENV_ENCODING: &str = "DAWG_ENCODING";
pub const ENV_NODE_BASE: &str = "DAWG_NODE_BASE";
pub const ENV_CHAIN_POLICY: &str = "DAWG_CHAIN_POLICY";
pub const ENV_MAX_DEPTH: &str = "DAWG_MAX_DEPTH";

/// How a letter lookup behaves when the sibling chain does not hold it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPolicy {
    /// Only the nodes of the chain are candidates.
    #[default]
    Strict,
    /// Keep scanning past the chain end up to the end of the section.
    OpenRange,
}

impl fmt::Display for ChainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainPolicy::Strict => write!(f, "strict"),
            ChainPolicy::OpenRange => write!(f, "open"),
        }
    }
}

impl FromStr for ChainPolicy {
    type Err = DawgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ChainPolicy::Strict),
            "open" | "open-range" | "open_range" => Ok(ChainPolicy::OpenRange),
            other => Err(DawgError::invalid_input(format!(
                "unknown chain policy {other} (expected strict or open)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DawgConfig {
    /// Bit layout of node records
    pub encoding: NodeEncoding,
    /// Byte offset of node 0
    pub node_base: u32,
    /// Lookup behaviour on a chain miss
    pub chain_policy: ChainPolicy,
    /// Longest path followed before a branch is abandoned
    pub max_depth: usize,
    /// Longest sibling chain read before it is abandoned
    pub max_chain_len: usize,
}

impl Default for DawgConfig {
    fn default() -> Self {
        Self {
            encoding: NodeEncoding::default(),
            node_base: DEFAULT_NODE_BASE,
            chain_policy: ChainPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_chain_len: DEFAULT_MAX_CHAIN_LEN,
        }
    }
}

impl DawgConfig {
    /// Defaults overlaid with any `DAWG_*` environment variables.
    pub fn from_env() -> Result<Self, DawgError> {
        let mut config = Self::default();
        if let Ok(value) = env::var(ENV_ENCODING) {
            config.encoding = value.parse()?;
        }
        if let Ok(value) = env::var(ENV_NODE_BASE) {
            config.node_base = parse_offset(&value)?;
        }
        if let Ok(value) = env::var(ENV_CHAIN_POLICY) {
            config.chain_policy = value.parse()?;
        }
        if let Ok(value) = env::var(ENV_MAX_DEPTH) {
            config.max_depth = value
                .trim()
                .parse()
                .map_err(|_| DawgError::invalid_input(format!("{ENV_MAX_DEPTH} expects an integer")))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_encoding(mut self, encoding: NodeEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_node_base(mut self, node_base: u32) -> Self {
        self.node_base = node_base;
        self
    }

    pub fn with_chain_policy(mut self, chain_policy: ChainPolicy) -> Self {
        self.chain_policy = chain_policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_chain_len(mut self, max_chain_len: usize) -> Self {
        self.max_chain_len = max_chain_len;
        self
    }

    pub fn validate(&self) -> Result<(), DawgError> {
        if (self.node_base as usize) < letter_index::END {
            return Err(DawgError::invalid_input(format!(
                "node base {:#x} overlaps the letter index (ends at {:#x})",
                self.node_base,
                letter_index::END
            )));
        }
        if self.max_depth == 0 || self.max_chain_len == 0 {
            return Err(DawgError::invalid_input(
                "traversal caps must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
pub fn parse_offset(value: &str) -> Result<u32, DawgError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };
    parsed.map_err(|_| DawgError::invalid_input(format!("invalid offset {trimmed}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_layout() {
        let cfg = DawgConfig::default();
        assert_eq!(cfg.node_base, 0x78);
        assert_eq!(cfg.encoding, NodeEncoding::Packed);
        assert_eq!(cfg.chain_policy, ChainPolicy::Strict);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_node_base_inside_letter_index_is_rejected() {
        let cfg = DawgConfig::default().with_node_base(0x40);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_parse_offset_accepts_hex_and_decimal() {
        assert_eq!(parse_offset("0x80").unwrap(), 128);
        assert_eq!(parse_offset("120").unwrap(), 120);
        assert!(parse_offset("0xZZ").is_err());
    }

    #[test]
    fn test_chain_policy_round_trips_display() {
        for policy in [ChainPolicy::Strict, ChainPolicy::OpenRange] {
            assert_eq!(policy.to_string().parse::<ChainPolicy>().unwrap(), policy);
        }
    }
}
