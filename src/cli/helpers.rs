//! Shared helper functions for CLI commands

use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::project::Project;

/// Open the project from --project or by walking up from the current dir
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let project = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    project.map_err(|e| miette::miette!("{}", e))
}

/// Resolve the output format: explicit flag wins, then the configured
/// default, then the command's own fallback
pub fn effective_format(
    global: &GlobalOpts,
    config: &Config,
    fallback: OutputFormat,
) -> OutputFormat {
    match global.format {
        OutputFormat::Auto => config
            .default_format
            .as_deref()
            .and_then(OutputFormat::from_name)
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback),
        f => f,
    }
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
