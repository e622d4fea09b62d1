//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project dot directory
const VAULT_DIR: &str = ".bomvault";

/// Represents a bomvault project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .bomvault/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let vault_dir = current.join(VAULT_DIR);
            if vault_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let vault_dir = root.join(VAULT_DIR);
        if vault_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .bomvault/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    fn create_structure(root: &Path) -> Result<(), ProjectError> {
        let vault_dir = root.join(VAULT_DIR);

        std::fs::create_dir_all(vault_dir.join("blobs"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = vault_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# bomvault project configuration

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Ask before deleting hierarchy nodes (default: true)
# confirm_delete: true
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .bomvault configuration directory
    pub fn vault_dir(&self) -> PathBuf {
        self.root.join(VAULT_DIR)
    }

    /// Get the directory holding retained original workbooks
    pub fn blobs_dir(&self) -> PathBuf {
        self.vault_dir().join("blobs")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a bomvault project (searched from {searched_from:?}). Run 'bomvault init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("bomvault project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
