//! Retained-workbook blob storage
//!
//! Every ingested workbook is kept verbatim under `.bomvault/blobs/`,
//! keyed by its leaf asset id, so the original file can be re-exported.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::project::Project;

/// Errors raised by the blob store
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob store I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no retained workbook for asset '{0}'")]
    Missing(String),
}

/// Directory of retained original workbooks
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Open the blob directory of a project, creating it if needed
    pub fn open(project: &Project) -> Result<Self, BlobError> {
        let root = project.blobs_dir();
        fs::create_dir_all(&root).map_err(|e| BlobError::Io {
            path: root.display().to_string(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// Retain workbook bytes for an asset, returning the blob reference
    pub fn retain(&self, asset_id: &str, bytes: &[u8]) -> Result<String, BlobError> {
        let file = self.blob_path(asset_id);
        fs::write(&file, bytes).map_err(|e| BlobError::Io {
            path: file.display().to_string(),
            source: e,
        })?;
        Ok(format!("blobs/{asset_id}.xlsx"))
    }

    /// Fetch the retained workbook bytes for an asset
    pub fn download(&self, asset_id: &str) -> Result<Vec<u8>, BlobError> {
        let file = self.blob_path(asset_id);
        if !file.exists() {
            return Err(BlobError::Missing(asset_id.to_string()));
        }
        fs::read(&file).map_err(|e| BlobError::Io {
            path: file.display().to_string(),
            source: e,
        })
    }

    /// Drop the retained workbook of an asset, if any
    pub fn remove(&self, asset_id: &str) -> Result<(), BlobError> {
        let file = self.blob_path(asset_id);
        match fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Io {
                path: file.display().to_string(),
                source: e,
            }),
        }
    }

    fn blob_path(&self, asset_id: &str) -> PathBuf {
        self.root.join(format!("{asset_id}.xlsx"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_retain_download_roundtrip() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let blobs = BlobStore::open(&project).unwrap();

        let blob_ref = blobs.retain("NODE-TEST", b"workbook bytes").unwrap();
        assert_eq!(blob_ref, "blobs/NODE-TEST.xlsx");
        assert_eq!(blobs.download("NODE-TEST").unwrap(), b"workbook bytes");
    }

    #[test]
    fn test_download_missing_blob() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let blobs = BlobStore::open(&project).unwrap();

        assert!(matches!(
            blobs.download("NODE-NONE"),
            Err(BlobError::Missing(_))
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let blobs = BlobStore::open(&project).unwrap();

        blobs.retain("NODE-TEST", b"bytes").unwrap();
        blobs.remove("NODE-TEST").unwrap();
        blobs.remove("NODE-TEST").unwrap();
        assert!(blobs.download("NODE-TEST").is_err());
    }
}
