//! Core type definitions for flowchart graphs
//!
//! Node types, nodes and edges as handed to presentation collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of the start sentinel node
pub const START_ID: &str = "start";

/// Id of the end sentinel node
pub const END_ID: &str = "end";

/// Semantic type of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Start sentinel
    Start,
    /// End sentinel
    End,
    /// Top-level (depth 1) heading
    Component,
    /// Project phase or roadmap section
    Phase,
    /// Step heading or descriptive list item
    Step,
    /// Any other heading
    Process,
    /// Code block
    Decision,
}

impl NodeType {
    /// Returns true for the start and end sentinels
    pub fn is_sentinel(&self) -> bool {
        matches!(self, NodeType::Start | NodeType::End)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Start => write!(f, "start"),
            NodeType::End => write!(f, "end"),
            NodeType::Component => write!(f, "component"),
            NodeType::Phase => write!(f, "phase"),
            NodeType::Step => write!(f, "step"),
            NodeType::Process => write!(f, "process"),
            NodeType::Decision => write!(f, "decision"),
        }
    }
}

/// A node in the flowchart graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier (`start`, `end`, `heading-N`, `list-N`, `code-N`, `paragraph-N`)
    pub id: String,
    /// Display label, without the emoji
    pub label: String,
    /// Semantic type
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Leading emoji lifted out of a heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Completion flag of a list item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl GraphNode {
    /// Create a node with no emoji and no completion flag
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            emoji: None,
            completed: None,
        }
    }

    /// Attach an emoji
    pub fn with_emoji(mut self, emoji: Option<String>) -> Self {
        self.emoji = emoji;
        self
    }

    /// Attach a completion flag
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Label as a renderer shows it: emoji first, when present
    pub fn display_label(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{} {}", emoji, self.label),
            None => self.label.clone(),
        }
    }

    /// Returns true if the node is marked completed
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Optional edge label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    /// Create an unlabeled edge
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    /// Create a labeled edge
    pub fn with_label(
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: Some(label.into()),
        }
    }

    /// Returns true if this edge connects `from` to `to`
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} -->|{}| {}", self.from, label, self.to),
            None => write!(f, "{} --> {}", self.from, self.to),
        }
    }
}
