//! `bomvault tree` command - Display the asset hierarchy
//!
//! With --filter, the forest is pruned to matches and their ancestor
//! chains, and every surviving node is expanded for display.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, open_project};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::store::Store;
use crate::tree::{self, TreeNode, TreeViewState};

#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    /// Narrow the tree to nodes whose name or path matches this query
    #[arg(long, short = 'F')]
    pub filter: Option<String>,

    /// Show full paths instead of names
    #[arg(long)]
    pub paths: bool,

    /// Highlight this node (id or path)
    #[arg(long)]
    pub select: Option<String>,
}

pub fn run(args: TreeArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
    let store = Store::open(&project).into_diagnostic()?;

    let nodes = store.list_nodes().into_diagnostic()?;
    if nodes.is_empty() {
        println!("No assets yet. Upload workbooks to get started.");
        return Ok(());
    }

    let forest = tree::build(nodes);
    let query = args.filter.as_deref().unwrap_or("");
    let forest = tree::filter(&forest, query);
    if forest.is_empty() {
        println!("No nodes match '{}'.", style(query).yellow());
        return Ok(());
    }

    let mut state = TreeViewState {
        expanded_ids: tree::expand_all(&forest),
        ..Default::default()
    };
    if let Some(selector) = &args.select {
        if let Ok(node) = store.resolve_node(selector) {
            state.select(Some(node.id));
        }
    }

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&forest).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yml::to_string(&forest).into_diagnostic()?);
        }
        OutputFormat::Id => {
            let mut ids: Vec<String> = state.expanded_ids.iter().cloned().collect();
            ids.sort();
            for id in ids {
                println!("{id}");
            }
        }
        _ => {
            for root in &forest {
                render_node(root, "", true, true, &state, args.paths);
            }
        }
    }

    Ok(())
}

fn render_node(
    tree: &TreeNode,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    state: &TreeViewState,
    show_paths: bool,
) {
    let label = if show_paths {
        &tree.node.path
    } else {
        &tree.node.name
    };

    let styled = if state.is_selected(&tree.node.id) {
        style(label).green().bold().to_string()
    } else if tree.node.is_asset() {
        style(label).cyan().to_string()
    } else {
        label.to_string()
    };

    if is_root {
        println!("{styled}");
    } else {
        let branch = if is_last { "└─ " } else { "├─ " };
        println!("{prefix}{branch}{styled}");
    }

    if !state.is_expanded(&tree.node.id) {
        return;
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "   " } else { "│  " })
    };

    for (i, child) in tree.children.iter().enumerate() {
        render_node(
            child,
            &child_prefix,
            i == tree.children.len() - 1,
            false,
            state,
            show_paths,
        );
    }
}
