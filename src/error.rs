/*!
# Errors

Every fallible operation of this crate returns [`Result<T>`]. The variants of [`GraphError`]
follow a small taxonomy ([`ErrorKind`]) so callers can react to the *kind* of failure without
matching on messages.
*/

use thiserror::Error;

/// Coarse classification of a [`GraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced node or edge does not exist
    NotFound,
    /// The operation does not match the configuration of the graph
    Configuration,
    /// The operation would violate a structural invariant
    InvalidOperation,
    /// A negative-weight cycle is reachable from the source
    NegativeCycle,
    /// The graph is required to be acyclic but is not
    Cycle,
}

/// Errors raised by graph operations and algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Referenced node is not part of the graph.
    #[error("node {0} not found")]
    NodeNotFound(String),

    /// Referenced edge is not part of the graph.
    #[error("edge {0} not found")]
    EdgeNotFound(String),

    /// Operation mismatched with the configuration of the graph.
    #[error("configuration mismatch: {0}")]
    Configuration(String),

    /// Operation violates a structural invariant.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Bellman-Ford found a negative cycle reachable from the given source.
    #[error("negative-weight cycle reachable from {0}")]
    NegativeCycle(String),

    /// Graph contains a (directed) cycle.
    #[error("graph contains a cycle")]
    Cycle,
}

impl GraphError {
    /// Returns the [`ErrorKind`] of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_) => ErrorKind::NotFound,
            GraphError::Configuration(_) => ErrorKind::Configuration,
            GraphError::InvalidOperation(_) => ErrorKind::InvalidOperation,
            GraphError::NegativeCycle(_) => ErrorKind::NegativeCycle,
            GraphError::Cycle => ErrorKind::Cycle,
        }
    }

    pub(crate) fn node_not_found<K: std::fmt::Debug>(key: &K) -> Self {
        GraphError::NodeNotFound(format!("{key:?}"))
    }

    pub(crate) fn edge_not_found<K: std::fmt::Debug>(u: &K, v: &K) -> Self {
        GraphError::EdgeNotFound(format!("({u:?}, {v:?})"))
    }
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
