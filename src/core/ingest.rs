//! Upload ingestion pipeline
//!
//! Files are ingested strictly one at a time, sheet by sheet, so that every
//! ancestor lookup observes nodes created earlier in the same batch. A
//! failure aborts only the current file; the batch carries on and reports
//! one aggregate result at the end.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::blob::{BlobError, BlobStore};
use crate::core::path::{normalize, PathError};
use crate::core::reconcile::{ensure_path, ReconcileError};
use crate::core::store::{Store, StoreError};
use crate::core::workbook::{read_workbook, WorkbookError};

/// Errors that can abort a single file's ingestion
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One file queued for ingestion: its hierarchy path plus source location
#[derive(Debug, Clone)]
pub struct Upload {
    /// "/"-separated path the asset lands at (folder uploads keep their
    /// directory structure, single files use the bare file name)
    pub hierarchy_path: String,
    /// Where the workbook file lives on disk
    pub source: PathBuf,
}

/// Per-file failure kept for the aggregate report
#[derive(Debug)]
pub struct FailedUpload {
    pub hierarchy_path: String,
    pub error: IngestError,
}

/// Aggregate outcome of an upload batch
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Hierarchy paths of successfully ingested files, in batch order
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedUpload>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Drives workbook ingestion against a store and blob directory
pub struct Ingestor<'a> {
    store: &'a mut Store,
    blobs: BlobStore,
}

impl<'a> Ingestor<'a> {
    pub fn new(store: &'a mut Store, blobs: BlobStore) -> Self {
        Self { store, blobs }
    }

    /// Ingest a batch sequentially. Failed files are collected, not fatal.
    pub fn ingest_batch(&mut self, uploads: &[Upload]) -> IngestReport {
        let mut report = IngestReport::default();

        for upload in uploads {
            match self.ingest_file(&upload.hierarchy_path, &upload.source) {
                Ok(_) => report.succeeded.push(upload.hierarchy_path.clone()),
                Err(error) => report.failed.push(FailedUpload {
                    hierarchy_path: upload.hierarchy_path.clone(),
                    error,
                }),
            }
        }

        report
    }

    /// Ingest one workbook: parse, reconcile the path, retain the original,
    /// then persist sheets and line items in native sheet order.
    pub fn ingest_file(&mut self, hierarchy_path: &str, source: &Path) -> Result<String, IngestError> {
        let segments = normalize(hierarchy_path)?;
        let parsed = read_workbook(source)?;

        let bytes = fs::read(source).map_err(|e| IngestError::Io {
            path: source.display().to_string(),
            source: e,
        })?;

        let mut metadata = parsed.metadata.clone();
        metadata.source_hash = Some(content_hash(&bytes));

        let leaf_id = ensure_path(self.store, &segments, &metadata)?;

        let blob_ref = self.blobs.retain(&leaf_id, &bytes)?;
        self.store.set_node_source(&leaf_id, &blob_ref)?;

        for sheet in &parsed.sheets {
            let sheet_id = self
                .store
                .insert_sheet(&leaf_id, &sheet.name, sheet.index as i64)?;
            self.store
                .insert_items(&leaf_id, Some(&sheet_id), &sheet.items)?;
        }

        Ok(leaf_id)
    }
}

/// SHA-256 hash of retained workbook content
fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
