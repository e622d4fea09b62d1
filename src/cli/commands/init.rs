//! `bomvault init` command - Initialize a new bomvault project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError};
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .bomvault/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    // Create directory if it doesn't exist
    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            // Materialize the store so status/tree work immediately
            Store::open(&project).into_diagnostic()?;

            println!(
                "{} Initialized bomvault project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!("Created project structure:");
            println!("  {}", style(".bomvault/").dim());
            println!("  {}", style(".bomvault/config.yaml").dim());
            println!("  {}", style(".bomvault/store.db").dim());
            println!("  {}", style(".bomvault/blobs/").dim());
            println!();
            println!("Next steps:");
            println!(
                "  {} Ingest workbooks or folders of workbooks",
                style("bomvault upload <paths>...").yellow()
            );
            println!(
                "  {} Browse the asset hierarchy",
                style("bomvault tree").yellow()
            );
            println!(
                "  {} View line items of an asset",
                style("bomvault bom list <asset>").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} bomvault project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("bomvault init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
