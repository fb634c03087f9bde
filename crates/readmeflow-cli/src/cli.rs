//! Command-line interface for the readmeflow utility
//!
//! Reads Markdown from a file or stdin and prints the flowchart graph as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use readmeflow::core::logging::init_logging;
use readmeflow::flowchart::{
    enhance_or_keep, Enhancer, Passthrough, PhaseLinker, StructureExtractor,
};
use readmeflow::{generate_flowchart_with, Database, FlowchartConfig, FlowchartError};

/// Readmeflow - Turn README Markdown into flowchart graphs
#[derive(Parser)]
#[command(name = "readmeflow")]
#[command(about = "Convert README-style Markdown into flowchart graph JSON")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Post-processing applied to the synthesized graph
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum EnhanceChoice {
    /// Output the synthesized graph as is
    #[default]
    None,
    /// Chain every phase-like node with "Next Phase" edges
    Phases,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a flowchart graph from Markdown
    Generate {
        /// Input Markdown file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the graph JSON (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// JSON file overriding the extraction and synthesis settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enhancement to run after synthesis
        #[arg(long, value_enum, default_value_t = EnhanceChoice::None)]
        enhance: EnhanceChoice,
    },

    /// Show the structural records extracted from Markdown
    Structure {
        /// Input Markdown file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the full records as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

/// Record counts printed by `structure`
#[derive(Debug)]
struct StructureSummary {
    headings: usize,
    list_items: usize,
    code_blocks: usize,
}

/// Main CLI application
#[derive(Default)]
pub struct ReadmeflowApp {
    config: FlowchartConfig,
}

impl ReadmeflowApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level = std::env::var(readmeflow::core::logging::LOG_LEVEL_ENV)
            .unwrap_or_else(|_| cli.log_level.as_str().to_string());
        let log_format = std::env::var(readmeflow::core::logging::LOG_FORMAT_ENV)
            .unwrap_or_else(|_| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Readmeflow v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                input,
                output,
                pretty,
                config,
                enhance,
            } => self.generate_command(input, output, pretty, config, enhance, cli.verbose),
            Commands::Structure { input, json } => self.structure_command(input, json, cli.verbose),
        }
    }

    /// Handle the generate command
    fn generate_command(
        &mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        pretty: bool,
        config: Option<PathBuf>,
        enhance: EnhanceChoice,
        verbose: bool,
    ) -> Result<()> {
        if let Some(path) = config {
            self.config = Self::load_config(&path)?;
        }

        let markdown = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", markdown.len());
        }

        let graph = generate_flowchart_with(&markdown, &self.config);

        let enhancer: Box<dyn Enhancer> = match enhance {
            EnhanceChoice::None => Box::new(Passthrough),
            EnhanceChoice::Phases => {
                Box::new(PhaseLinker::with_label(self.config.next_phase_label.clone()))
            }
        };
        debug!(enhancer = enhancer.name(), "Running enhancer");
        let graph = enhance_or_keep(enhancer.as_ref(), &markdown, graph);

        let json = if pretty {
            graph.to_json_pretty()?
        } else {
            graph.to_json()?
        };

        if verbose {
            eprintln!(
                "Generated graph with {} nodes and {} edges",
                graph.node_count(),
                graph.edge_count()
            );
        }

        self.write_output(output, &json)
    }

    /// Handle the structure command
    fn structure_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let markdown = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", markdown.len());
        }

        let structure = StructureExtractor::with_config(self.config.clone()).extract(&markdown);

        if json {
            println!("{}", serde_json::to_string_pretty(structure.records())?);
            return Ok(());
        }

        let summary = StructureSummary {
            headings: structure.headings().count(),
            list_items: structure.list_items().count(),
            code_blocks: structure.code_blocks().count(),
        };
        println!("Headings:    {}", summary.headings);
        println!("List items:  {}", summary.list_items);
        println!("Code blocks: {}", summary.code_blocks);
        debug!(?summary, "Structure summary");
        Ok(())
    }

    fn load_config(path: &Path) -> Result<FlowchartConfig> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Read Markdown from file or stdin, rejecting non-UTF-8 input
    fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        let bytes = match input {
            Some(path) if path.to_str() != Some("-") => fs::read(&path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?,
            _ => {
                let mut buffer = Vec::new();
                io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read from stdin")?;
                buffer
            }
        };

        let markdown = String::from_utf8(bytes).map_err(|e| {
            FlowchartError::invalid_argument(format!("markdown input is not valid UTF-8: {}", e))
        })?;
        Ok(markdown)
    }

    /// Write output to file or stdout
    fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_str() != Some("-") => {
                fs::write(&path, format!("{}\n", content))
                    .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            }
            _ => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{}", content)?;
            }
        }
        Ok(())
    }
}
