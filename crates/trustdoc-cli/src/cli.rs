//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TrustDoc CLI - Turn extraction model output into cited trust summaries.
#[derive(Debug, Parser)]
#[command(name = "trustdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TRUSTDOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Template file (TOML or JSON)
    #[arg(short, long, global = true, env = "TRUSTDOC_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// JSON format (default)
    Json,
    /// Table format
    Table,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a document and its extraction payload
    Process(ProcessArgs),

    /// Resolve citation keys of a stored result to highlight spans
    Resolve(ResolveArgs),

    /// List the citations of a stored result with their keys
    Citations(CitationsArgs),

    /// Show the active template and its extraction classes
    Template(TemplateArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Document text file
    #[arg(short, long, conflicts_with = "stdin")]
    pub document: Option<PathBuf>,

    /// Extraction payload file (model output JSON)
    #[arg(short, long, conflicts_with = "stdin")]
    pub extractions: Option<PathBuf>,

    /// Prose files scanned for quoted citations (repeatable)
    #[arg(long)]
    pub narrative: Vec<PathBuf>,

    /// Read a JSON request from stdin instead of files
    #[arg(long)]
    pub stdin: bool,

    /// Filename recorded in the result (defaults to the document's name)
    #[arg(long)]
    pub filename: Option<String>,

    /// Output directory for persisted artifacts
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Do not persist the result
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Formatted result file
    #[arg(short, long)]
    pub result: PathBuf,

    /// Original document text file
    #[arg(short, long)]
    pub document: PathBuf,

    /// Citation keys (`class` or `class#N`); all citations when omitted
    pub keys: Vec<String>,
}

/// Arguments for the citations command.
#[derive(Debug, Parser)]
pub struct CitationsArgs {
    /// Formatted result file
    #[arg(short, long)]
    pub result: PathBuf,
}

/// Arguments for the template command.
#[derive(Debug, Parser)]
pub struct TemplateArgs {
    /// Print only the extraction class vocabulary
    #[arg(long)]
    pub classes: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the default configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Table => crate::config::OutputFormat::Table,
        }
    }
}
