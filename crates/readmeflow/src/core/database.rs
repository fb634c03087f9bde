//! Core database trait for graph storage
//!
//! The synthesizer writes into a [`Database`], and enhancers edit one. Every
//! implementation must reject edits that would leave a dangling edge.

use super::FlowchartError;

/// Core trait for flowchart graph storage
///
/// Nodes and edges are kept in insertion order; implementations must not
/// reorder them, since tests compare node and edge sequences directly.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node; fails if its id is already taken
    fn add_node(&mut self, node: Self::Node) -> Result<(), FlowchartError>;

    /// Add an edge; fails if either endpoint is unknown
    fn add_edge(&mut self, edge: Self::Edge) -> Result<(), FlowchartError>;

    /// Get a node by ID
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
