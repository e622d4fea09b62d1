//! `bomvault status` command - Store statistics dashboard

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, open_project};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
    let store = Store::open(&project).into_diagnostic()?;
    let stats = store.stats().into_diagnostic()?;

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats).into_diagnostic()?);
        }
        _ => {
            let width = 40;
            println!("{}", style("BOM Vault Status").bold().underlined());
            println!("{}", "═".repeat(width));
            println!("{:<14} {}", "Nodes", style(stats.total_nodes).cyan());
            println!("{:<14} {}", "Assets", style(stats.assets).cyan());
            println!("{:<14} {}", "Folders", style(stats.folders).cyan());
            println!("{:<14} {}", "Sheets", style(stats.sheets).cyan());
            println!("{:<14} {}", "Line items", style(stats.line_items).cyan());

            if !stats.nodes_by_level.is_empty() {
                println!();
                println!("{}", style("Nodes by level").bold());
                for level in &stats.nodes_by_level {
                    println!("  level {:<3} {}", level.level, level.count);
                }
            }
        }
    }

    Ok(())
}
