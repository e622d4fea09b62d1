//! SQLite-backed record store
//!
//! This module owns the persistent rows behind the asset hierarchy:
//! - hierarchy nodes, keyed by unique path
//! - workbook sheets, ordered by native position
//! - BOM line items, belonging to sheets
//!
//! Subtree removal cascades through foreign keys; the core never walks
//! descendants to delete them.

mod queries;
mod schema;
mod types;

// Re-export all types
pub use types::*;

use std::fs;

use rusqlite::Connection;
use thiserror::Error;

use crate::core::project::Project;

/// Store file location within a project
const STORE_FILE: &str = ".bomvault/store.db";

/// Current schema version - store is rebuilt on version mismatch
const SCHEMA_VERSION: i32 = 2;

/// Errors raised by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store rejected the operation: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The record store backed by SQLite
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store for a project
    pub fn open(project: &Project) -> Result<Self, StoreError> {
        let store_path = project.root().join(STORE_FILE);

        if let Some(parent) = store_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let needs_init = !store_path.exists();
        let conn = Connection::open(&store_path)?;

        // WAL for better concurrent reads; cascades need foreign keys on
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        let mut store = Self { conn };

        if needs_init {
            store.init_schema()?;
        } else if store.needs_schema_rebuild()? {
            store.reinitialize_schema()?;
        }

        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let mut store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Check if schema version matches current version
    fn needs_schema_rebuild(&self) -> Result<bool, StoreError> {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(current_version != SCHEMA_VERSION)
    }
}
