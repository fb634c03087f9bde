//! Graph synthesis
//!
//! Turns a [`Structure`] into a [`FlowchartGraph`]. Headings are wired by
//! depth when a parent one level up is known and fall back to the previous
//! node otherwise, so loosely structured documents still come out as one
//! connected chain from `start` to `end`.

use tracing::{debug, span, trace, Level};

use super::graph::FlowchartGraph;
use super::text::contains_ignore_case;
use crate::core::{
    CodeBlock, Database, FlowchartConfig, GraphEdge, GraphNode, Heading, ListItem, NodeType,
    StructuralRecord, Structure, END_ID, START_ID,
};

/// Highest Markdown heading level
const MAX_DEPTH: usize = 6;

/// Classify a heading by depth and text
///
/// Depth 1 always wins, then phase/roadmap sections at depth 2, then "step"
/// anywhere in the text.
pub fn heading_node_type(heading: &Heading) -> NodeType {
    if heading.depth == 1 {
        NodeType::Component
    } else if heading.depth == 2
        && (contains_ignore_case(&heading.text, "phase")
            || contains_ignore_case(&heading.text, "roadmap"))
    {
        NodeType::Phase
    } else if contains_ignore_case(&heading.text, "step") {
        NodeType::Step
    } else {
        NodeType::Process
    }
}

/// Last heading id seen at each depth
///
/// Recording a heading forgets every deeper entry, since those belonged to
/// the previous branch.
#[derive(Debug, Default)]
struct DepthTable {
    slots: [Option<String>; MAX_DEPTH + 1],
}

impl DepthTable {
    fn get(&self, depth: usize) -> Option<&str> {
        self.slots.get(depth).and_then(|slot| slot.as_deref())
    }

    fn record(&mut self, depth: usize, id: &str) {
        let depth = depth.min(MAX_DEPTH);
        self.slots[depth] = Some(id.to_string());
        for slot in self.slots.iter_mut().skip(depth + 1) {
            *slot = None;
        }
    }
}

/// Flowchart graph synthesizer
#[derive(Debug, Clone, Default)]
pub struct GraphSynthesizer {
    config: FlowchartConfig,
}

impl GraphSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FlowchartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowchartConfig {
        &self.config
    }

    /// Build the graph for `structure`
    ///
    /// Deterministic and infallible: the same records always give the same
    /// nodes and edges, and the result always holds both sentinels. Record
    /// ids are unique and distinct from the sentinels, which [`Structure`]
    /// checks on construction.
    pub fn synthesize(&self, structure: &Structure) -> FlowchartGraph {
        let synth_span = span!(Level::DEBUG, "synthesize", records = structure.len());
        let _enter = synth_span.enter();

        let mut state = Synthesis {
            config: &self.config,
            graph: FlowchartGraph::new(),
            depths: DepthTable::default(),
            cursor: START_ID.to_string(),
            phases: Vec::new(),
            has_headings: structure.has_headings(),
            seen_records: 0,
        };

        state
            .graph
            .push_node(GraphNode::new(START_ID, &self.config.start_label, NodeType::Start));

        if structure.is_empty() {
            debug!("Empty structure, emitting sentinels only");
        }

        for record in structure.records() {
            match record {
                StructuralRecord::Heading(heading) => state.heading(heading),
                StructuralRecord::ListItem(item) => state.list_item(item),
                StructuralRecord::CodeBlock(code) => state.code_block(code),
            }
            state.seen_records += 1;
        }

        let graph = state.finish();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph synthesized"
        );
        graph
    }
}

/// Per-call synthesis state
struct Synthesis<'c> {
    config: &'c FlowchartConfig,
    graph: FlowchartGraph,
    depths: DepthTable,
    cursor: String,
    phases: Vec<String>,
    has_headings: bool,
    seen_records: usize,
}

impl Synthesis<'_> {
    fn heading(&mut self, heading: &Heading) {
        let node_type = heading_node_type(heading);
        self.graph.push_node(
            GraphNode::new(&heading.id, &heading.text, node_type).with_emoji(heading.emoji.clone()),
        );

        let depth = usize::from(heading.depth);
        let from = match depth.checked_sub(1).and_then(|d| self.depths.get(d)) {
            Some(parent) => parent.to_string(),
            None if depth == 2 => START_ID.to_string(),
            None => self.cursor.clone(),
        };
        self.graph.connect(GraphEdge::new(from, &heading.id));

        self.cursor = heading.id.clone();
        self.depths.record(depth, &heading.id);

        if node_type == NodeType::Phase {
            self.phases.push(heading.id.clone());
        }
    }

    fn list_item(&mut self, item: &ListItem) {
        if item.text.chars().count() <= self.config.min_list_item_len {
            trace!(id = %item.id, "Dropping short list item");
            return;
        }

        self.graph.push_node(
            GraphNode::new(&item.id, &item.text, NodeType::Step).with_completed(item.completed),
        );

        match item.parent_heading_id.as_deref() {
            Some(parent) if self.graph.has_node(parent) => {
                self.graph.connect(GraphEdge::new(parent, &item.id));
            }
            _ => debug!(id = %item.id, "List item has no parent heading, leaving it unattached"),
        }
    }

    fn code_block(&mut self, code: &CodeBlock) {
        self.graph.push_node(GraphNode::new(
            &code.id,
            format!("Code ({})", code.lang),
            NodeType::Decision,
        ));

        let from = if self.seen_records == 0 && !self.has_headings {
            START_ID.to_string()
        } else {
            self.cursor.clone()
        };
        self.graph.connect(GraphEdge::new(from, &code.id));
        self.cursor = code.id.clone();
    }

    fn finish(mut self) -> FlowchartGraph {
        self.graph
            .push_node(GraphNode::new(END_ID, &self.config.end_label, NodeType::End));

        if self.phases.len() >= 2 {
            let ids: Vec<&str> = self.phases.iter().map(String::as_str).collect();
            for pair in ids.windows(2) {
                if !self.graph.has_edge(pair[0], pair[1]) {
                    self.graph.connect(GraphEdge::with_label(
                        pair[0],
                        pair[1],
                        &self.config.next_phase_label,
                    ));
                }
            }
        }

        if self.phases.is_empty() {
            self.graph.connect(GraphEdge::new(&self.cursor, END_ID));
        } else {
            for phase in &self.phases {
                self.graph.connect(GraphEdge::new(phase, END_ID));
            }
        }

        self.graph
    }
}

/// Synthesize with the default configuration
pub fn synthesize(structure: &Structure) -> FlowchartGraph {
    GraphSynthesizer::new().synthesize(structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(depth: u8, text: &str, n: usize) -> StructuralRecord {
        StructuralRecord::Heading(Heading {
            depth,
            text: text.to_string(),
            id: format!("heading-{}", n),
            emoji: None,
        })
    }

    fn edge_pairs(graph: &FlowchartGraph) -> Vec<(String, String)> {
        graph
            .edges()
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect()
    }

    fn pair(from: &str, to: &str) -> (String, String) {
        (from.to_string(), to.to_string())
    }

    #[test]
    fn test_heading_types() {
        let h = |depth, text: &str| Heading {
            depth,
            text: text.to_string(),
            id: "heading-1".to_string(),
            emoji: None,
        };
        assert_eq!(heading_node_type(&h(1, "Step one")), NodeType::Component);
        assert_eq!(heading_node_type(&h(2, "Phase 1: Plan")), NodeType::Phase);
        assert_eq!(heading_node_type(&h(2, "Project ROADMAP")), NodeType::Phase);
        assert_eq!(heading_node_type(&h(3, "Phase notes")), NodeType::Process);
        assert_eq!(heading_node_type(&h(3, "Step 2: Build")), NodeType::Step);
        assert_eq!(heading_node_type(&h(2, "Next steps")), NodeType::Step);
        assert_eq!(heading_node_type(&h(4, "Details")), NodeType::Process);
    }

    #[test]
    fn test_depth_table_clears_deeper_entries() {
        let mut table = DepthTable::default();
        table.record(1, "heading-1");
        table.record(2, "heading-2");
        table.record(3, "heading-3");
        table.record(2, "heading-4");
        assert_eq!(table.get(1), Some("heading-1"));
        assert_eq!(table.get(2), Some("heading-4"));
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn test_empty_structure() {
        let graph = synthesize(&Structure::new());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(edge_pairs(&graph), vec![pair("start", "end")]);
    }

    #[test]
    fn test_sibling_reset_reconnects_deeper_heading_via_cursor() {
        let structure = Structure::from_records(vec![
            heading(1, "Root", 1),
            heading(2, "A", 2),
            heading(3, "A.1", 3),
            heading(2, "B", 4),
            heading(4, "B deep", 5),
        ])
        .unwrap();
        let graph = synthesize(&structure);
        assert_eq!(
            edge_pairs(&graph),
            vec![
                pair("start", "heading-1"),
                pair("heading-1", "heading-2"),
                pair("heading-2", "heading-3"),
                pair("heading-1", "heading-4"),
                pair("heading-4", "heading-5"),
                pair("heading-5", "end"),
            ]
        );
    }

    #[test]
    fn test_second_top_level_heading_follows_cursor() {
        let structure = Structure::from_records(vec![
            heading(1, "First", 1),
            heading(3, "Deep", 2),
            heading(1, "Second", 3),
        ])
        .unwrap();
        let graph = synthesize(&structure);
        assert_eq!(
            edge_pairs(&graph),
            vec![
                pair("start", "heading-1"),
                pair("heading-1", "heading-2"),
                pair("heading-2", "heading-3"),
                pair("heading-3", "end"),
            ]
        );
    }

    #[test]
    fn test_short_list_items_are_dropped() {
        let structure = Structure::from_records(vec![
            heading(2, "Tasks", 1),
            StructuralRecord::ListItem(ListItem {
                text: "0123456789".to_string(),
                id: "list-1".to_string(),
                completed: true,
                parent_heading_id: Some("heading-1".to_string()),
            }),
            StructuralRecord::ListItem(ListItem {
                text: "0123456789A".to_string(),
                id: "list-2".to_string(),
                completed: false,
                parent_heading_id: Some("heading-1".to_string()),
            }),
        ])
        .unwrap();
        let graph = synthesize(&structure);
        assert!(!graph.has_node("list-1"));
        assert_eq!(graph.get_node("list-2").unwrap().completed, Some(false));
        assert!(graph.has_edge("heading-1", "list-2"));
        assert!(graph.has_edge("heading-1", "end"));
    }

    #[test]
    fn test_unattached_list_item_has_no_inbound_edge() {
        let structure = Structure::from_records(vec![StructuralRecord::ListItem(ListItem {
            text: "An item before any heading".to_string(),
            id: "list-1".to_string(),
            completed: false,
            parent_heading_id: None,
        })])
        .unwrap();
        let graph = synthesize(&structure);
        assert!(graph.has_node("list-1"));
        assert_eq!(graph.in_degree("list-1"), 0);
        assert_eq!(edge_pairs(&graph), vec![pair("start", "end")]);
    }

    #[test]
    fn test_code_blocks_chain_through_cursor() {
        let code = |n: usize| {
            StructuralRecord::CodeBlock(CodeBlock {
                id: format!("code-{}", n),
                lang: "sh".to_string(),
                value: String::new(),
            })
        };
        let graph = synthesize(&Structure::from_records(vec![code(1), code(2)]).unwrap());
        assert_eq!(
            edge_pairs(&graph),
            vec![
                pair("start", "code-1"),
                pair("code-1", "code-2"),
                pair("code-2", "end"),
            ]
        );
        assert_eq!(graph.get_node("code-1").unwrap().label, "Code (sh)");
    }

    #[test]
    fn test_phases_chain_and_all_reach_end() {
        let structure = Structure::from_records(vec![
            heading(2, "Phase 1", 1),
            heading(3, "Details", 2),
            heading(2, "Phase 2", 3),
            heading(2, "Phase 3", 4),
        ])
        .unwrap();
        let graph = synthesize(&structure);
        let next: Vec<_> = graph
            .edges()
            .filter(|e| e.label.as_deref() == Some("Next Phase"))
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect();
        assert_eq!(
            next,
            vec![pair("heading-1", "heading-3"), pair("heading-3", "heading-4")]
        );
        assert_eq!(graph.predecessors("end"), vec!["heading-1", "heading-3", "heading-4"]);
        assert!(!graph.has_edge("heading-2", "end"));
    }

    #[test]
    fn test_custom_labels() {
        let config = FlowchartConfig::new().with_sentinel_labels("Begin", "Done");
        let graph = GraphSynthesizer::with_config(config).synthesize(&Structure::new());
        assert_eq!(graph.start().unwrap().label, "Begin");
        assert_eq!(graph.end().unwrap().label, "Done");
    }
}
