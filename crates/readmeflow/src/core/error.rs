//! Core error types for flowchart generation
//!
//! The pipeline itself never fails on Markdown content: parse degradations,
//! unattached list items and empty documents are all handled locally. The
//! variants here cover the remaining cases: bad arguments at the byte-level
//! entry point, and graph edits that would break the node/edge invariants.

use thiserror::Error;

/// Errors surfaced by the flowchart library
#[derive(Error, Debug)]
pub enum FlowchartError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Dangling edge: {from} -> {to} references a node that does not exist")]
    DanglingEdge { from: String, to: String },

    #[error("Duplicate node id: {id}")]
    DuplicateNode { id: String },

    #[error("Graph must contain exactly one {kind} node, found {count}")]
    MissingSentinel { kind: String, count: usize },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl FlowchartError {
    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new dangling edge error
    pub fn dangling_edge(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::DanglingEdge {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new duplicate node error
    pub fn duplicate_node(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Create a new sentinel cardinality error
    pub fn missing_sentinel(kind: impl Into<String>, count: usize) -> Self {
        Self::MissingSentinel {
            kind: kind.into(),
            count,
        }
    }
}
