//! Readmeflow - Turn README-style Markdown into flowchart graphs
//!
//! Headings, list items and code blocks are extracted from a Markdown
//! document and wired into a directed graph with fixed `start` and `end`
//! nodes. The output is structural data only: nodes with a semantic type,
//! edges with an optional label. Layout and rendering belong to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use readmeflow::generate_flowchart;
//! use readmeflow::prelude::*;
//!
//! let graph = generate_flowchart("# Title\n\n## Phase 1: Plan\n\n## Phase 2: Build\n");
//! assert_eq!(graph.start().unwrap().node_type, NodeType::Start);
//! assert!(graph.has_edge("heading-2", "heading-3"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use readmeflow::prelude::*;
//!
//! let config = FlowchartConfig::new().with_min_list_item_len(3);
//! let structure = StructureExtractor::with_config(config.clone()).extract("## Todo\n\n- ship\n");
//! assert_eq!(structure.list_items().count(), 1);
//!
//! let graph = GraphSynthesizer::with_config(config).synthesize(&structure);
//! assert!(graph.has_edge("heading-1", "list-1"));
//! ```

pub mod core;
pub mod flowchart;

pub use crate::core::*;
pub use flowchart::{extract_structure, synthesize, FlowchartGraph};

use tracing::{info, span, Level};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, FlowchartConfig, FlowchartError, GraphEdge, GraphNode, NodeType,
        StructuralRecord, Structure,
    };
    pub use crate::flowchart::{
        Enhancer, FlowchartGraph, GraphSynthesizer, Passthrough, PhaseLinker, StructureExtractor,
    };
}

/// Generate a flowchart graph from Markdown
///
/// Never fails: documents without headings fall back to paragraphs, and an
/// empty document yields `start -> end`.
///
/// # Example
/// ```rust
/// use readmeflow::generate_flowchart;
/// use readmeflow::prelude::Database;
///
/// let graph = generate_flowchart("");
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub fn generate_flowchart(markdown: &str) -> FlowchartGraph {
    generate_flowchart_with(markdown, &FlowchartConfig::default())
}

/// Generate a flowchart graph with explicit configuration
pub fn generate_flowchart_with(markdown: &str, config: &FlowchartConfig) -> FlowchartGraph {
    use crate::flowchart::{GraphSynthesizer, StructureExtractor};

    let pipeline_span = span!(Level::INFO, "generate_flowchart", input_len = markdown.len());
    let _enter = pipeline_span.enter();

    let structure = StructureExtractor::with_config(config.clone()).extract(markdown);
    let graph = GraphSynthesizer::with_config(config.clone()).synthesize(&structure);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Flowchart generated"
    );
    graph
}

/// Generate a flowchart graph from raw bytes
///
/// # Returns
/// * `Ok(FlowchartGraph)` - The graph, as [`generate_flowchart`] would build it
/// * `Err(FlowchartError::InvalidArgument)` - If the bytes are not UTF-8
///
/// # Example
/// ```rust
/// use readmeflow::{generate_flowchart_from_bytes, FlowchartError};
///
/// assert!(generate_flowchart_from_bytes(b"# Hello").is_ok());
/// assert!(matches!(
///     generate_flowchart_from_bytes(&[0xff, 0xfe]),
///     Err(FlowchartError::InvalidArgument { .. })
/// ));
/// ```
pub fn generate_flowchart_from_bytes(bytes: &[u8]) -> Result<FlowchartGraph, FlowchartError> {
    let markdown = std::str::from_utf8(bytes).map_err(|e| {
        FlowchartError::invalid_argument(format!("markdown input is not valid UTF-8: {}", e))
    })?;
    Ok(generate_flowchart(markdown))
}

/// Generate a flowchart graph, then hand it to an enhancer
///
/// The enhancer only sees the finished graph; if it fails or returns an
/// invalid graph the synthesized one is returned instead.
pub fn generate_enhanced_flowchart(
    markdown: &str,
    enhancer: &dyn flowchart::Enhancer,
) -> FlowchartGraph {
    let graph = generate_flowchart(markdown);
    flowchart::enhance_or_keep(enhancer, markdown, graph)
}
