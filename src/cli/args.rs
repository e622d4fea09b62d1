//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    bom::BomCommands, completions::CompletionsArgs, export::ExportArgs, init::InitArgs,
    rm::RmArgs, show::ShowArgs, status::StatusArgs, tree::TreeArgs, upload::UploadArgs,
};

#[derive(Parser)]
#[command(name = "bomvault")]
#[command(author, version, about = "BOM workbook vault")]
#[command(
    long_about = "Ingest BOM spreadsheet workbooks into a navigable asset hierarchy with per-sheet line item tables."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .bomvault/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new bomvault project
    Init(InitArgs),

    /// Ingest workbook files or folders into the hierarchy
    Upload(UploadArgs),

    /// Display the asset hierarchy, optionally filtered
    Tree(TreeArgs),

    /// Show a hierarchy node and its metadata
    Show(ShowArgs),

    /// BOM line item operations (list, edit, export)
    #[command(subcommand)]
    Bom(BomCommands),

    /// Write out the retained original workbook of an asset
    Export(ExportArgs),

    /// Remove a node and everything below it
    Rm(RmArgs),

    /// Show store statistics dashboard
    Status(StatusArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Parse a configured format name (used for config defaults)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "auto" => Some(OutputFormat::Auto),
            "yaml" => Some(OutputFormat::Yaml),
            "tsv" => Some(OutputFormat::Tsv),
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            "md" => Some(OutputFormat::Md),
            "id" => Some(OutputFormat::Id),
            _ => None,
        }
    }
}
