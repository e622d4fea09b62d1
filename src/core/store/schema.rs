//! Database schema initialization

use rusqlite::params;

use super::{Store, StoreError, SCHEMA_VERSION};

impl Store {
    /// Initialize the database schema
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Hierarchy nodes: folders and leaf assets, one row per path
            CREATE TABLE IF NOT EXISTS asset_hierarchy (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                parent_id TEXT REFERENCES asset_hierarchy(id) ON DELETE CASCADE,
                path TEXT NOT NULL UNIQUE,
                level INTEGER NOT NULL,
                assembly_name TEXT,
                assembly_manufacturer TEXT,
                description TEXT,
                system TEXT,
                rebuild_item TEXT,
                asset_number TEXT,
                approval_date TEXT,
                total_cost REAL,
                source_blob TEXT,
                source_hash TEXT,
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_hierarchy_parent ON asset_hierarchy(parent_id);
            CREATE INDEX IF NOT EXISTS idx_hierarchy_level ON asset_hierarchy(level);

            -- Workbook sheets, ordered by native position
            CREATE TABLE IF NOT EXISTS asset_sheets (
                id TEXT PRIMARY KEY,
                asset_id TEXT NOT NULL REFERENCES asset_hierarchy(id) ON DELETE CASCADE,
                sheet_name TEXT NOT NULL,
                sheet_index INTEGER NOT NULL,
                UNIQUE (asset_id, sheet_index)
            );
            CREATE INDEX IF NOT EXISTS idx_sheets_asset ON asset_sheets(asset_id);

            -- BOM line items; sheet_id is NULL for legacy ungrouped rows
            CREATE TABLE IF NOT EXISTS bom_items (
                id TEXT PRIMARY KEY,
                asset_id TEXT NOT NULL REFERENCES asset_hierarchy(id) ON DELETE CASCADE,
                sheet_id TEXT REFERENCES asset_sheets(id) ON DELETE CASCADE,
                item_no TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                details TEXT NOT NULL DEFAULT '',
                manufacturer TEXT NOT NULL DEFAULT '',
                part_number TEXT NOT NULL DEFAULT '',
                item_code TEXT NOT NULL DEFAULT '',
                uom TEXT NOT NULL DEFAULT '',
                sys_qty REAL,
                cost REAL
            );
            CREATE INDEX IF NOT EXISTS idx_items_asset ON bom_items(asset_id);
            CREATE INDEX IF NOT EXISTS idx_items_sheet ON bom_items(sheet_id);
            "#,
        )?;

        // Set schema version
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    /// Drop all tables and reinitialize schema
    pub(super) fn reinitialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            DROP TABLE IF EXISTS schema_version;
            DROP TABLE IF EXISTS bom_items;
            DROP TABLE IF EXISTS asset_sheets;
            DROP TABLE IF EXISTS asset_hierarchy;
            "#,
        )?;

        self.init_schema()?;
        Ok(())
    }
}
