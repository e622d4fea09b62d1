//! `bomvault export` command - Write out the retained original workbook

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_project;
use crate::cli::GlobalOpts;
use crate::core::blob::BlobStore;
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Asset node id or path
    pub asset: String,

    /// Output file (default: <asset name>.xlsx)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let store = Store::open(&project).into_diagnostic()?;
    let blobs = BlobStore::open(&project).into_diagnostic()?;

    let node = store.resolve_node(&args.asset).into_diagnostic()?;
    if !node.is_asset() {
        return Err(miette::miette!(
            "'{}' is a folder node, not an uploaded asset",
            node.path
        ));
    }

    let bytes = blobs.download(&node.id).into_diagnostic()?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.xlsx", node.name)));
    std::fs::write(&output, bytes).into_diagnostic()?;

    println!(
        "{} Exported original workbook of {} to {}",
        style("✓").green(),
        style(&node.name).bold(),
        style(output.display()).cyan()
    );
    Ok(())
}
