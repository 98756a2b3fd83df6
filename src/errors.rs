use thiserror::Error;

#[derive(Debug, Error)]
pub enum DawgError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    #[error("letter index entry '{letter}' points at node {index}, outside section 1 (end {limit})")]
    IndexOutOfRange { letter: char, index: u32, limit: u32 },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("capacity exceeded: {count} nodes (maximum {max})")]
    CapacityExceeded { count: usize, max: usize },
}

impl DawgError {
    pub fn malformed_header<T: Into<String>>(msg: T) -> Self {
        DawgError::MalformedHeader(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        DawgError::InvalidInput(msg.into())
    }
}

/// Anomalies met while walking the node array.
///
/// None of these escape `validate` or `enumerate`: they are logged and the
/// affected branch is treated as "no match".
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TraversalFault {
    #[error("node {index} does not decode to a letter")]
    NotANode { index: u32 },
    #[error("node index {index} outside range (end {limit})")]
    IndexOutOfRange { index: u32, limit: u32 },
    #[error("traversal depth {depth} exceeds cap {max}")]
    DepthExceeded { depth: usize, max: usize },
    #[error("sibling chain at {start} longer than cap {max}")]
    ChainLengthExceeded { start: u32, max: usize },
}

impl TraversalFault {
    /// `NotANode` ends chains routinely; the other faults should not occur
    /// on well-formed data.
    pub fn is_anomaly(&self) -> bool {
        !matches!(self, TraversalFault::NotANode { .. })
    }
}
