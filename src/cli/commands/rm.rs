//! `bomvault rm` command - Remove a node and everything below it
//!
//! Sheets and line items of removed assets cascade in the store; retained
//! workbook blobs are cleaned up best-effort afterwards.

use console::style;
use dialoguer::Confirm;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_project;
use crate::cli::GlobalOpts;
use crate::core::blob::BlobStore;
use crate::core::config::Config;
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Node id or path to remove
    pub node: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
    let store = Store::open(&project).into_diagnostic()?;
    let blobs = BlobStore::open(&project).into_diagnostic()?;

    let node = store.resolve_node(&args.node).into_diagnostic()?;
    let subtree = store.list_subtree_ids(&node.path).into_diagnostic()?;

    if !args.yes && config.confirm_delete() {
        let descendants = subtree.len().saturating_sub(1);
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove '{}' and {} node(s) below it?",
                node.path, descendants
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;

        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.delete_node(&node.id).into_diagnostic()?;

    // Blob cleanup is best-effort; the rows are already gone
    for id in &subtree {
        let _ = blobs.remove(id);
    }

    println!(
        "{} Removed {} ({} node(s))",
        style("✓").green(),
        style(&node.path).cyan(),
        subtree.len()
    );
    Ok(())
}
