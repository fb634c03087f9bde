//! Core abstractions for flowchart generation
//!
//! Shared vocabulary of the pipeline: errors, logging, configuration, the
//! structural records produced by extraction, and the graph types produced
//! by synthesis.

mod config;
mod database;
mod error;
pub mod logging;
mod structure;
mod types;

pub use config::*;
pub use database::*;
pub use error::*;
pub use logging::*;
pub use structure::*;
pub use types::*;
