//! Core module - ingestion engine and its collaborators

pub mod blob;
pub mod config;
pub mod identity;
pub mod ingest;
pub mod path;
pub mod project;
pub mod reconcile;
pub mod store;
pub mod workbook;

pub use blob::{BlobError, BlobStore};
pub use config::Config;
pub use identity::{IdParseError, RecordId, RecordPrefix};
pub use ingest::{IngestError, IngestReport, Ingestor, Upload};
pub use project::{Project, ProjectError};
pub use store::{AssetMetadata, HierarchyNode, Store, StoreError};
