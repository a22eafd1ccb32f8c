//! Error types for the ranking crate.

use thiserror::Error;

/// Errors raised by the selector, the graph and the ranking queries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// `peek_min`/`pop_min` on an empty selector. During a drain this just
    /// means every element has been taken out.
    #[error("structure is empty")]
    EmptyStructure,

    /// An edge or query referenced a node id outside `[0, node_count)`
    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    /// Edges from a node to itself are not allowed
    #[error("self-loop on node {node} is not allowed")]
    SelfLoop { node: usize },

    /// Edge weights must be finite and non-negative
    #[error("invalid edge weight {weight}")]
    InvalidWeight { weight: f64 },

    /// A top-K query was asked for zero results
    #[error("k must be at least 1, got {k}")]
    InvalidK { k: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RankingError>;
