//! Post-synthesis enhancement seam
//!
//! An [`Enhancer`] receives the source Markdown and the synthesized graph
//! and returns a new graph. It runs strictly after synthesis and never sees
//! intermediate state, so the core graph stays correct on its own.

use tracing::{debug, warn};

use super::graph::FlowchartGraph;
use super::text::contains_ignore_case;
use crate::core::{FlowchartError, NodeType};

/// Rewrites a synthesized graph
///
/// Implementations must leave the input untouched and return a graph that
/// still satisfies the sentinel and endpoint invariants.
pub trait Enhancer: Send + Sync {
    /// Produce an enhanced copy of `graph`
    fn enhance(
        &self,
        markdown: &str,
        graph: &FlowchartGraph,
    ) -> Result<FlowchartGraph, FlowchartError>;

    /// Get the name of this enhancer
    fn name(&self) -> &'static str;
}

/// Returns the graph unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Enhancer for Passthrough {
    fn enhance(
        &self,
        _markdown: &str,
        graph: &FlowchartGraph,
    ) -> Result<FlowchartGraph, FlowchartError> {
        Ok(graph.clone())
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// Chains phases in node order with labeled edges
///
/// A node counts as a phase when it is typed `phase` or its label mentions
/// "phase" in any case, which also catches deeper phase headings the
/// synthesizer typed as `process`.
#[derive(Debug, Clone)]
pub struct PhaseLinker {
    label: String,
}

impl PhaseLinker {
    pub fn new() -> Self {
        Self::with_label("Next Phase")
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for PhaseLinker {
    fn default() -> Self {
        Self::new()
    }
}

impl Enhancer for PhaseLinker {
    fn enhance(
        &self,
        _markdown: &str,
        graph: &FlowchartGraph,
    ) -> Result<FlowchartGraph, FlowchartError> {
        use crate::core::Database;

        let phase_ids: Vec<String> = graph
            .nodes()
            .filter(|n| n.node_type == NodeType::Phase || contains_ignore_case(&n.label, "phase"))
            .map(|n| n.id.clone())
            .collect();

        let mut enhanced = graph.clone();
        if phase_ids.len() < 2 {
            return Ok(enhanced);
        }

        let ids: Vec<&str> = phase_ids.iter().map(String::as_str).collect();
        let added = enhanced.link_sequence(&ids, &self.label)?;
        debug!(phases = ids.len(), added, "Linked phases");
        Ok(enhanced)
    }

    fn name(&self) -> &'static str {
        "phase-linker"
    }
}

/// Run `enhancer`, keeping the original graph if it fails
///
/// Enhancement is optional by contract, so a failing enhancer degrades to the
/// synthesized graph instead of surfacing an error.
pub fn enhance_or_keep(
    enhancer: &dyn Enhancer,
    markdown: &str,
    graph: FlowchartGraph,
) -> FlowchartGraph {
    match enhancer
        .enhance(markdown, &graph)
        .and_then(|enhanced| enhanced.validate().map(|_| enhanced))
    {
        Ok(enhanced) => enhanced,
        Err(err) => {
            warn!(enhancer = enhancer.name(), error = %err, "Enhancement failed, keeping synthesized graph");
            graph
        }
    }
}
