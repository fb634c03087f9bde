//! Flowchart graph store
//!
//! Ordered nodes and edges with an id index. The public [`Database`] methods
//! validate every edit; the synthesizer uses the crate-private `connect`,
//! which only ever sees ids it has just inserted.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::trace;

use crate::core::{
    Database, FlowchartError, GraphEdge, GraphNode, NodeType, END_ID, START_ID,
};

/// Plain node and edge lists, the serialized form of a [`FlowchartGraph`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Flowchart graph
///
/// Always holds exactly one `start` and one `end` node once built by the
/// synthesizer or rebuilt through [`FlowchartGraph::from_parts`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct FlowchartGraph {
    /// Nodes in insertion order
    nodes: Vec<GraphNode>,
    /// Edges in insertion order
    edges: Vec<GraphEdge>,
    /// Node id to position in `nodes`
    index: HashMap<String, usize>,
}

impl PartialEq for FlowchartGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl Eq for FlowchartGraph {}

impl FlowchartGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from plain lists, checking every invariant
    pub fn from_parts(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    ) -> Result<Self, FlowchartError> {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        graph.validate()?;
        Ok(graph)
    }

    /// Split the graph into plain node and edge lists
    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }

    /// Check id uniqueness, sentinel cardinality and edge endpoints
    pub fn validate(&self) -> Result<(), FlowchartError> {
        if self.index.len() != self.nodes.len() {
            let mut seen = HashSet::new();
            if let Some(node) = self.nodes.iter().find(|n| !seen.insert(n.id.as_str())) {
                return Err(FlowchartError::duplicate_node(&node.id));
            }
        }
        for (kind, node_type) in [("start", NodeType::Start), ("end", NodeType::End)] {
            let count = self.nodes_of_type(node_type).count();
            if count != 1 {
                return Err(FlowchartError::missing_sentinel(kind, count));
            }
        }
        if let Some(edge) = self
            .edges
            .iter()
            .find(|e| !self.has_node(&e.from) || !self.has_node(&e.to))
        {
            return Err(FlowchartError::dangling_edge(&edge.from, &edge.to));
        }
        Ok(())
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Check if any edge connects `from` to `to`, whatever its label
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.connects(from, to))
    }

    /// Get edges between two specific nodes
    pub fn edges_between(&self, from: &str, to: &str) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.connects(from, to)).collect()
    }

    /// Get in-degree (number of incoming edges) for a node
    pub fn in_degree(&self, node_id: &str) -> usize {
        self.edges.iter().filter(|e| e.to == node_id).count()
    }

    /// Get out-degree (number of outgoing edges) for a node
    pub fn out_degree(&self, node_id: &str) -> usize {
        self.edges.iter().filter(|e| e.from == node_id).count()
    }

    /// Get IDs of nodes that this node points to
    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.from == node_id)
            .map(|e| e.to.as_str())
            .collect()
    }

    /// Get IDs of nodes that point to this node
    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.to == node_id)
            .map(|e| e.from.as_str())
            .collect()
    }

    /// Get source nodes (no incoming edges)
    pub fn source_nodes(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| self.in_degree(&n.id) == 0)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Get sink nodes (no outgoing edges)
    pub fn sink_nodes(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| self.out_degree(&n.id) == 0)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Nodes of one type, in insertion order
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    /// The start sentinel
    pub fn start(&self) -> Option<&GraphNode> {
        self.get_node(START_ID)
    }

    /// The end sentinel
    pub fn end(&self) -> Option<&GraphNode> {
        self.get_node(END_ID)
    }

    /// Connect consecutive ids with labeled edges
    ///
    /// A pair that already has an edge between them, in that direction, is
    /// left alone. Returns the number of edges added.
    pub fn link_sequence(&mut self, ids: &[&str], label: &str) -> Result<usize, FlowchartError> {
        let mut added = 0;
        for pair in ids.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if self.has_edge(from, to) {
                trace!(from, to, "Sequence edge already present");
                continue;
            }
            self.add_edge(GraphEdge::with_label(from, to, label))?;
            added += 1;
        }
        Ok(added)
    }

    /// Serialize as compact JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize as indented JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Insert a node without checking its id
    ///
    /// A repeated id is left for [`FlowchartGraph::validate`] to report.
    pub(crate) fn push_node(&mut self, node: GraphNode) {
        trace!(id = %node.id, node_type = %node.node_type, "Adding node");
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Insert an edge whose endpoints are known to exist
    pub(crate) fn connect(&mut self, edge: GraphEdge) {
        debug_assert!(
            self.has_node(&edge.from) && self.has_node(&edge.to),
            "dangling edge {}",
            edge
        );
        trace!(edge = %edge, "Adding edge");
        self.edges.push(edge);
    }
}

impl Database for FlowchartGraph {
    type Node = GraphNode;
    type Edge = GraphEdge;

    fn add_node(&mut self, node: GraphNode) -> Result<(), FlowchartError> {
        if self.has_node(&node.id) {
            return Err(FlowchartError::duplicate_node(node.id));
        }
        self.push_node(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: GraphEdge) -> Result<(), FlowchartError> {
        if !self.has_node(&edge.from) || !self.has_node(&edge.to) {
            return Err(FlowchartError::dangling_edge(edge.from, edge.to));
        }
        self.connect(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl TryFrom<GraphData> for FlowchartGraph {
    type Error = FlowchartError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        Self::from_parts(data.nodes, data.edges)
    }
}

impl From<FlowchartGraph> for GraphData {
    fn from(graph: FlowchartGraph) -> Self {
        let (nodes, edges) = graph.into_parts();
        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinels() -> FlowchartGraph {
        let mut graph = FlowchartGraph::new();
        graph
            .add_node(GraphNode::new(START_ID, "Start", NodeType::Start))
            .unwrap();
        graph
            .add_node(GraphNode::new(END_ID, "End", NodeType::End))
            .unwrap();
        graph
    }

    #[test]
    fn test_add_and_query() {
        let mut graph = sentinels();
        graph
            .add_node(GraphNode::new("heading-1", "Intro", NodeType::Component))
            .unwrap();
        graph.add_edge(GraphEdge::new(START_ID, "heading-1")).unwrap();
        graph.add_edge(GraphEdge::new("heading-1", END_ID)).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors(START_ID), vec!["heading-1"]);
        assert_eq!(graph.predecessors(END_ID), vec!["heading-1"]);
        assert_eq!(graph.source_nodes(), vec![START_ID]);
        assert_eq!(graph.sink_nodes(), vec![END_ID]);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let mut graph = sentinels();
        let err = graph
            .add_edge(GraphEdge::new(START_ID, "heading-7"))
            .unwrap_err();
        assert!(matches!(err, FlowchartError::DanglingEdge { .. }));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_rejects_duplicate_node() {
        let mut graph = sentinels();
        let err = graph
            .add_node(GraphNode::new(START_ID, "Again", NodeType::Start))
            .unwrap_err();
        assert!(matches!(err, FlowchartError::DuplicateNode { .. }));
    }

    #[test]
    fn test_link_sequence_skips_existing_pairs() {
        let mut graph = sentinels();
        for id in ["heading-1", "heading-2", "heading-3"] {
            graph
                .add_node(GraphNode::new(id, id, NodeType::Phase))
                .unwrap();
        }
        graph.add_edge(GraphEdge::new("heading-1", "heading-2")).unwrap();

        let added = graph
            .link_sequence(&["heading-1", "heading-2", "heading-3"], "Next Phase")
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(graph.edges_between("heading-1", "heading-2").len(), 1);
        assert_eq!(
            graph.edges_between("heading-2", "heading-3")[0].label.as_deref(),
            Some("Next Phase")
        );
    }

    #[test]
    fn test_validate_reports_duplicate_ids() {
        let mut graph = sentinels();
        graph.push_node(GraphNode::new("heading-1", "One", NodeType::Process));
        graph.push_node(GraphNode::new("heading-1", "Two", NodeType::Process));
        let err = graph.validate().unwrap_err();
        assert!(matches!(err, FlowchartError::DuplicateNode { ref id } if id == "heading-1"));

        let mut graph = sentinels();
        graph.push_node(GraphNode::new(END_ID, "Other end", NodeType::Process));
        assert!(matches!(
            graph.validate(),
            Err(FlowchartError::DuplicateNode { .. })
        ));
    }

    #[test]
    fn test_validate_requires_sentinels() {
        let mut graph = FlowchartGraph::new();
        graph
            .add_node(GraphNode::new(START_ID, "Start", NodeType::Start))
            .unwrap();
        let err = graph.validate().unwrap_err();
        assert!(matches!(err, FlowchartError::MissingSentinel { count: 0, .. }));
    }

    #[test]
    fn test_json_round_trip_validates() {
        let mut graph = sentinels();
        graph.add_edge(GraphEdge::new(START_ID, END_ID)).unwrap();
        let json = graph.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"nodes":[{"id":"start","label":"Start","type":"start"},{"id":"end","label":"End","type":"end"}],"edges":[{"from":"start","to":"end"}]}"#
        );

        let back: FlowchartGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);

        let dangling = r#"{"nodes":[{"id":"start","label":"Start","type":"start"},{"id":"end","label":"End","type":"end"}],"edges":[{"from":"start","to":"nowhere"}]}"#;
        assert!(serde_json::from_str::<FlowchartGraph>(dangling).is_err());
    }

    #[test]
    fn test_clear() {
        let mut graph = sentinels();
        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert!(graph.start().is_none());
    }
}
