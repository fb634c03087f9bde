//! Markdown-to-flowchart pipeline
//!
//! Text flows one way: [`StructureExtractor`] turns Markdown into a
//! [`Structure`](crate::core::Structure), [`GraphSynthesizer`] turns that into
//! a [`FlowchartGraph`], and an optional [`Enhancer`] may rewrite the result.

mod enhancer;
mod extractor;
mod graph;
mod synthesizer;
pub mod text;

pub use enhancer::*;
pub use extractor::*;
pub use graph::*;
pub use synthesizer::*;
