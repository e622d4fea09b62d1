//! `bomvault show` command - Show a hierarchy node and its metadata

use std::collections::HashMap;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, open_project};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Node id or full path
    pub node: String,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
    let store = Store::open(&project).into_diagnostic()?;

    let node = store.resolve_node(&args.node).into_diagnostic()?;
    let sheets = store.list_sheets(&node.id).into_diagnostic()?;
    let items = store.list_items(&node.id).into_diagnostic()?;

    let mut per_sheet: HashMap<Option<String>, usize> = HashMap::new();
    for item in &items {
        *per_sheet.entry(item.sheet_id.clone()).or_default() += 1;
    }

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "node": node, "sheets": sheets });
            println!("{}", serde_json::to_string_pretty(&payload).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let payload = serde_json::json!({ "node": node, "sheets": sheets });
            println!("{}", serde_yml::to_string(&payload).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", node.id),
        _ => {
            println!("{}", style(&node.name).bold());
            println!("{:<14} {}", style("id").dim(), node.id);
            println!("{:<14} {}", style("path").dim(), node.path);
            println!("{:<14} {}", style("level").dim(), node.level);
            if let Some(parent) = &node.parent_id {
                println!("{:<14} {}", style("parent").dim(), parent);
            }
            println!("{:<14} {}", style("created").dim(), node.created.to_rfc3339());

            if let Some(meta) = &node.metadata {
                println!();
                println!("{}", style("Metadata").bold());
                print_field("assembly name", meta.assembly_name.as_deref());
                print_field("manufacturer", meta.assembly_manufacturer.as_deref());
                print_field("description", meta.description.as_deref());
                print_field("system", meta.system.as_deref());
                print_field("rebuild item", meta.rebuild_item.as_deref());
                print_field("asset number", meta.asset_number.as_deref());
                print_field("approval date", meta.approval_date.as_deref());
                if let Some(cost) = meta.total_cost {
                    println!("{:<14} ${:.2}", style("total cost").dim(), cost);
                }
                print_field("source blob", meta.source_blob.as_deref());
            }

            if !sheets.is_empty() {
                println!();
                println!("{}", style("Sheets").bold());
                for sheet in &sheets {
                    let count = per_sheet.get(&Some(sheet.id.clone())).copied().unwrap_or(0);
                    println!(
                        "  {} {} ({} items)",
                        style(sheet.sheet_index).cyan(),
                        sheet.sheet_name,
                        count
                    );
                }
            }

            let ungrouped = per_sheet.get(&None).copied().unwrap_or(0);
            if ungrouped > 0 {
                println!("  {} (ungrouped legacy items: {})", style("-").dim(), ungrouped);
            }
        }
    }

    Ok(())
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{:<14} {}", style(label).dim(), value);
    }
}
