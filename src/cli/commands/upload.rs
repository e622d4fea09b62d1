//! `bomvault upload` command - Ingest workbook files and folders
//!
//! Directories are walked for workbook files and keep their structure as
//! hierarchy paths (the directory name itself is the first segment, the
//! way a browser folder upload reports relative paths). Single files land
//! under their bare name.

use std::path::{Path, PathBuf};

use console::style;
use miette::{IntoDiagnostic, Result};
use walkdir::WalkDir;

use crate::cli::helpers::open_project;
use crate::cli::GlobalOpts;
use crate::core::blob::BlobStore;
use crate::core::ingest::{Ingestor, Upload};
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Workbook files or directories to ingest
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

pub fn run(args: UploadArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let mut store = Store::open(&project).into_diagnostic()?;
    let blobs = BlobStore::open(&project).into_diagnostic()?;

    let uploads = collect_uploads(&args.paths);
    if uploads.is_empty() {
        println!("No workbook files found.");
        return Ok(());
    }

    let mut ingestor = Ingestor::new(&mut store, blobs);
    let report = ingestor.ingest_batch(&uploads);

    if !global.quiet {
        for path in &report.succeeded {
            println!("{} {}", style("✓").green(), path);
        }
        for failed in &report.failed {
            println!("{} {}", style("✗").red(), failed.hierarchy_path);
            if global.verbose {
                eprintln!("  {}", style(&failed.error).dim());
            }
        }
    }

    if report.is_clean() {
        println!(
            "{} {} file(s) uploaded",
            style("✓").green(),
            report.succeeded.len()
        );
        Ok(())
    } else {
        // One aggregate notice for the whole batch
        Err(miette::miette!(
            "upload failed: {} of {} file(s) could not be ingested",
            report.failed.len(),
            report.total()
        ))
    }
}

/// Expand file and directory arguments into ingestion order
fn collect_uploads(paths: &[PathBuf]) -> Vec<Upload> {
    let mut uploads = Vec::new();

    for path in paths {
        if path.is_dir() {
            let base = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| is_workbook(e.path()))
            {
                let rel = entry.path().strip_prefix(path).unwrap_or(entry.path());
                let mut segments = vec![base.clone()];
                segments.extend(
                    rel.components()
                        .map(|c| c.as_os_str().to_string_lossy().to_string()),
                );

                uploads.push(Upload {
                    hierarchy_path: segments.join("/"),
                    source: entry.path().to_path_buf(),
                });
            }
        } else {
            // Single file (existing or not - a missing file surfaces as a
            // per-file ingestion failure rather than aborting the batch)
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            uploads.push(Upload {
                hierarchy_path: name,
                source: path.clone(),
            });
        }
    }

    uploads
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "xlsx" || ext == "xls"
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_workbook() {
        assert!(is_workbook(Path::new("a/b.xlsx")));
        assert!(is_workbook(Path::new("a/b.XLS")));
        assert!(!is_workbook(Path::new("a/b.csv")));
        assert!(!is_workbook(Path::new("a/b")));
    }

    #[test]
    fn test_collect_uploads_walks_directories() {
        let tmp = tempdir().unwrap();
        let unit = tmp.path().join("Plant/Unit1");
        std::fs::create_dir_all(&unit).unwrap();
        std::fs::write(unit.join("pump.xlsx"), b"x").unwrap();
        std::fs::write(unit.join("notes.txt"), b"x").unwrap();

        let uploads = collect_uploads(&[tmp.path().join("Plant")]);
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].hierarchy_path, "Plant/Unit1/pump.xlsx");
    }

    #[test]
    fn test_collect_uploads_single_file_uses_bare_name() {
        let uploads = collect_uploads(&[PathBuf::from("/some/where/boiler.xlsx")]);
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].hierarchy_path, "boiler.xlsx");
    }
}
