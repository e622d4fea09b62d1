//! Query methods for hierarchy nodes, sheets and line items
//!
//! Inserts return the generated record id. Selects come back in the
//! orderings the browsing layer relies on: nodes by path, sheets by
//! native index, line items by item number.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::core::identity::{RecordId, RecordPrefix};

use super::{
    AssetMetadata, HierarchyNode, ItemField, LevelCount, LineItemRow, NewLineItem, SheetRow,
    Store, StoreError, StoreStats,
};

const NODE_COLUMNS: &str = "id, name, parent_id, path, level, assembly_name, \
     assembly_manufacturer, description, system, rebuild_item, asset_number, \
     approval_date, total_cost, source_blob, source_hash, created";

const ITEM_COLUMNS: &str = "id, asset_id, sheet_id, item_no, description, details, \
     manufacturer, part_number, item_code, uom, sys_qty, cost";

const UPDATE_METADATA_SQL: &str = "UPDATE asset_hierarchy SET assembly_name = ?1, \
     assembly_manufacturer = ?2, description = ?3, system = ?4, rebuild_item = ?5, \
     asset_number = ?6, approval_date = ?7, total_cost = ?8, source_blob = ?9, \
     source_hash = ?10 WHERE id = ?11";

impl Store {
    // =========================================================================
    // Hierarchy Nodes
    // =========================================================================

    /// Insert a hierarchy node, returning its generated id
    pub fn insert_node(
        &self,
        name: &str,
        parent_id: Option<&str>,
        path: &str,
        level: i64,
        metadata: Option<&AssetMetadata>,
    ) -> Result<String, StoreError> {
        let id = RecordId::new(RecordPrefix::Node).to_string();
        let meta = metadata.cloned().unwrap_or_default();

        self.conn.execute(
            "INSERT INTO asset_hierarchy (id, name, parent_id, path, level, assembly_name, \
             assembly_manufacturer, description, system, rebuild_item, asset_number, \
             approval_date, total_cost, source_blob, source_hash, created) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                id,
                name,
                parent_id,
                path,
                level,
                meta.assembly_name,
                meta.assembly_manufacturer,
                meta.description,
                meta.system,
                meta.rebuild_item,
                meta.asset_number,
                meta.approval_date,
                meta.total_cost,
                meta.source_blob,
                meta.source_hash,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(id)
    }

    /// Look up a node by its unique path
    pub fn find_node_by_path(&self, path: &str) -> Result<Option<HierarchyNode>, StoreError> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM asset_hierarchy WHERE path = ?1");
        let node = self
            .conn
            .query_row(&sql, params![path], row_to_node)
            .optional()?;
        Ok(node)
    }

    /// Get a node by id
    pub fn get_node(&self, id: &str) -> Result<HierarchyNode, StoreError> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM asset_hierarchy WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_node)
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                kind: "node",
                id: id.to_string(),
            })
    }

    /// Resolve a node from a user-supplied selector: record id first, then path
    pub fn resolve_node(&self, selector: &str) -> Result<HierarchyNode, StoreError> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM asset_hierarchy WHERE id = ?1");
        if let Some(node) = self
            .conn
            .query_row(&sql, params![selector], row_to_node)
            .optional()?
        {
            return Ok(node);
        }

        self.find_node_by_path(selector)?
            .ok_or_else(|| StoreError::NotFound {
                kind: "node",
                id: selector.to_string(),
            })
    }

    /// All nodes, ordered by path (deterministic sibling order)
    pub fn list_nodes(&self) -> Result<Vec<HierarchyNode>, StoreError> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM asset_hierarchy ORDER BY path");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_node)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Ids of a node and every node below it, by path prefix
    pub fn list_subtree_ids(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM asset_hierarchy WHERE path = ?1 OR path LIKE ?1 || '/%'",
        )?;
        let rows = stmt.query_map(params![path], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Record the retained-workbook blob reference on a leaf node
    pub fn set_node_source(&self, id: &str, blob_ref: &str) -> Result<(), StoreError> {
        let affected = self.conn.execute(
            "UPDATE asset_hierarchy SET source_blob = ?1 WHERE id = ?2",
            params![blob_ref, id],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: "node",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Re-upload path: overwrite metadata and drop the previous sheets and
    /// line items of an asset in one transaction, so readers never observe
    /// a mix of old and new content.
    pub fn replace_asset(&mut self, id: &str, metadata: &AssetMetadata) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        let affected = tx.execute(
            UPDATE_METADATA_SQL,
            params![
                metadata.assembly_name,
                metadata.assembly_manufacturer,
                metadata.description,
                metadata.system,
                metadata.rebuild_item,
                metadata.asset_number,
                metadata.approval_date,
                metadata.total_cost,
                metadata.source_blob,
                metadata.source_hash,
                id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: "node",
                id: id.to_string(),
            });
        }

        tx.execute("DELETE FROM bom_items WHERE asset_id = ?1", params![id])?;
        tx.execute("DELETE FROM asset_sheets WHERE asset_id = ?1", params![id])?;

        tx.commit()?;
        Ok(())
    }

    /// Delete a node; descendants, sheets and items cascade via foreign keys
    pub fn delete_node(&self, id: &str) -> Result<(), StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM asset_hierarchy WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: "node",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Sheets
    // =========================================================================

    /// Insert a sheet record, returning its generated id
    pub fn insert_sheet(
        &self,
        asset_id: &str,
        sheet_name: &str,
        sheet_index: i64,
    ) -> Result<String, StoreError> {
        let id = RecordId::new(RecordPrefix::Sheet).to_string();
        self.conn.execute(
            "INSERT INTO asset_sheets (id, asset_id, sheet_name, sheet_index) \
             VALUES (?1, ?2, ?3, ?4)",
            params![id, asset_id, sheet_name, sheet_index],
        )?;
        Ok(id)
    }

    /// Sheets of an asset in native workbook order
    pub fn list_sheets(&self, asset_id: &str) -> Result<Vec<SheetRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, asset_id, sheet_name, sheet_index FROM asset_sheets \
             WHERE asset_id = ?1 ORDER BY sheet_index",
        )?;
        let rows = stmt.query_map(params![asset_id], |row| {
            Ok(SheetRow {
                id: row.get(0)?,
                asset_id: row.get(1)?,
                sheet_name: row.get(2)?,
                sheet_index: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Bulk-insert the line items of one sheet in a single transaction
    pub fn insert_items(
        &mut self,
        asset_id: &str,
        sheet_id: Option<&str>,
        items: &[NewLineItem],
    ) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO bom_items (id, asset_id, sheet_id, item_no, description, \
                 details, manufacturer, part_number, item_code, uom, sys_qty, cost) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;

            for item in items {
                let id = RecordId::new(RecordPrefix::Item).to_string();
                stmt.execute(params![
                    id,
                    asset_id,
                    sheet_id,
                    item.item_no,
                    item.description,
                    item.details,
                    item.manufacturer,
                    item.part_number,
                    item.item_code,
                    item.uom,
                    item.sys_qty,
                    item.cost,
                ])?;
            }
        }
        tx.commit()?;
        Ok(items.len())
    }

    /// All line items of an asset, ordered by item number
    pub fn list_items(&self, asset_id: &str) -> Result<Vec<LineItemRow>, StoreError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM bom_items WHERE asset_id = ?1 ORDER BY item_no"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![asset_id], row_to_item)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Get a line item by id
    pub fn get_item(&self, id: &str) -> Result<LineItemRow, StoreError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM bom_items WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_item)
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                kind: "line item",
                id: id.to_string(),
            })
    }

    /// Update a single text field of a line item
    pub fn update_item_text(
        &self,
        id: &str,
        field: ItemField,
        value: &str,
    ) -> Result<(), StoreError> {
        debug_assert!(!field.is_numeric());
        let sql = format!("UPDATE bom_items SET {} = ?1 WHERE id = ?2", field.column());
        let affected = self.conn.execute(&sql, params![value, id])?;

        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: "line item",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Update a single numeric field of a line item (None clears it)
    pub fn update_item_number(
        &self,
        id: &str,
        field: ItemField,
        value: Option<f64>,
    ) -> Result<(), StoreError> {
        debug_assert!(field.is_numeric());
        let sql = format!("UPDATE bom_items SET {} = ?1 WHERE id = ?2", field.column());
        let affected = self.conn.execute(&sql, params![value, id])?;

        if affected == 0 {
            return Err(StoreError::NotFound {
                kind: "line item",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Store-wide statistics for the status dashboard
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        let total_nodes: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM asset_hierarchy", [], |row| row.get(0))?;

        let assets: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM asset_hierarchy WHERE source_hash IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let sheets: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM asset_sheets", [], |row| row.get(0))?;

        let line_items: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM bom_items", [], |row| row.get(0))?;

        let mut nodes_by_level = Vec::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT level, COUNT(*) FROM asset_hierarchy GROUP BY level ORDER BY level",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(LevelCount {
                    level: row.get(0)?,
                    count: row.get::<_, i64>(1)? as usize,
                })
            })?;
            for row in rows {
                nodes_by_level.push(row?);
            }
        }

        Ok(StoreStats {
            total_nodes,
            assets,
            folders: total_nodes.saturating_sub(assets),
            sheets,
            line_items,
            nodes_by_level,
        })
    }
}

/// Map a row with NODE_COLUMNS into a HierarchyNode
fn row_to_node(row: &Row<'_>) -> rusqlite::Result<HierarchyNode> {
    let metadata = AssetMetadata {
        assembly_name: row.get(5)?,
        assembly_manufacturer: row.get(6)?,
        description: row.get(7)?,
        system: row.get(8)?,
        rebuild_item: row.get(9)?,
        asset_number: row.get(10)?,
        approval_date: row.get(11)?,
        total_cost: row.get(12)?,
        source_blob: row.get(13)?,
        source_hash: row.get(14)?,
    };

    Ok(HierarchyNode {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
        path: row.get(3)?,
        level: row.get(4)?,
        metadata: if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        },
        created: parse_datetime(row.get::<_, String>(15)?),
    })
}

/// Map a row with ITEM_COLUMNS into a LineItemRow
fn row_to_item(row: &Row<'_>) -> rusqlite::Result<LineItemRow> {
    Ok(LineItemRow {
        id: row.get(0)?,
        asset_id: row.get(1)?,
        sheet_id: row.get(2)?,
        item_no: row.get(3)?,
        description: row.get(4)?,
        details: row.get(5)?,
        manufacturer: row.get(6)?,
        part_number: row.get(7)?,
        item_code: row.get(8)?,
        uom: row.get(9)?,
        sys_qty: row.get(10)?,
        cost: row.get(11)?,
    })
}

/// Parse datetime string to DateTime<Utc>
fn parse_datetime(s: String) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_with_name(name: &str) -> AssetMetadata {
        AssetMetadata {
            assembly_name: Some(name.to_string()),
            source_hash: Some("deadbeef".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_find_by_path() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_node("Plant", None, "Plant", 0, None).unwrap();

        let found = store.find_node_by_path("Plant").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.level, 0);
        assert!(found.metadata.is_none());

        assert!(store.find_node_by_path("Missing").unwrap().is_none());
    }

    #[test]
    fn test_list_nodes_ordered_by_path() {
        let store = Store::open_in_memory().unwrap();
        let root = store.insert_node("Plant", None, "Plant", 0, None).unwrap();
        store
            .insert_node("Valve", Some(&root), "Plant/Valve", 1, None)
            .unwrap();
        store
            .insert_node("Pump", Some(&root), "Plant/Pump", 1, None)
            .unwrap();

        let paths: Vec<String> = store
            .list_nodes()
            .unwrap()
            .into_iter()
            .map(|n| n.path)
            .collect();
        assert_eq!(paths, vec!["Plant", "Plant/Pump", "Plant/Valve"]);
    }

    #[test]
    fn test_delete_cascades_to_descendants_and_items() {
        let mut store = Store::open_in_memory().unwrap();
        let root = store.insert_node("Plant", None, "Plant", 0, None).unwrap();
        let leaf = store
            .insert_node(
                "pump",
                Some(&root),
                "Plant/pump",
                1,
                Some(&meta_with_name("Pump")),
            )
            .unwrap();
        let sheet = store.insert_sheet(&leaf, "Sheet1", 0).unwrap();
        store
            .insert_items(
                &leaf,
                Some(&sheet),
                &[NewLineItem {
                    item_no: "1".into(),
                    ..Default::default()
                }],
            )
            .unwrap();

        store.delete_node(&root).unwrap();

        assert!(store.find_node_by_path("Plant/pump").unwrap().is_none());
        assert!(store.list_items(&leaf).unwrap().is_empty());
        assert!(store.list_sheets(&leaf).unwrap().is_empty());
    }

    #[test]
    fn test_replace_asset_clears_previous_contents() {
        let mut store = Store::open_in_memory().unwrap();
        let leaf = store
            .insert_node("pump", None, "pump", 0, Some(&meta_with_name("Pump v1")))
            .unwrap();
        let sheet = store.insert_sheet(&leaf, "Sheet1", 0).unwrap();
        store
            .insert_items(
                &leaf,
                Some(&sheet),
                &[NewLineItem::default(), NewLineItem::default()],
            )
            .unwrap();

        store
            .replace_asset(&leaf, &meta_with_name("Pump v2"))
            .unwrap();

        let node = store.get_node(&leaf).unwrap();
        assert_eq!(
            node.metadata.unwrap().assembly_name.as_deref(),
            Some("Pump v2")
        );
        assert!(store.list_sheets(&leaf).unwrap().is_empty());
        assert!(store.list_items(&leaf).unwrap().is_empty());
    }

    #[test]
    fn test_items_ordered_by_item_no() {
        let mut store = Store::open_in_memory().unwrap();
        let leaf = store
            .insert_node("pump", None, "pump", 0, Some(&meta_with_name("Pump")))
            .unwrap();
        let sheet = store.insert_sheet(&leaf, "Sheet1", 0).unwrap();
        let items: Vec<NewLineItem> = ["3", "1", "2"]
            .iter()
            .map(|n| NewLineItem {
                item_no: n.to_string(),
                ..Default::default()
            })
            .collect();
        store.insert_items(&leaf, Some(&sheet), &items).unwrap();

        let numbers: Vec<String> = store
            .list_items(&leaf)
            .unwrap()
            .into_iter()
            .map(|i| i.item_no)
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_update_item_field() {
        let mut store = Store::open_in_memory().unwrap();
        let leaf = store
            .insert_node("pump", None, "pump", 0, Some(&meta_with_name("Pump")))
            .unwrap();
        let sheet = store.insert_sheet(&leaf, "Sheet1", 0).unwrap();
        store
            .insert_items(&leaf, Some(&sheet), &[NewLineItem::default()])
            .unwrap();
        let item = store.list_items(&leaf).unwrap().remove(0);

        store
            .update_item_text(&item.id, ItemField::Uom, "EA")
            .unwrap();
        store
            .update_item_number(&item.id, ItemField::SysQty, Some(4.0))
            .unwrap();

        let updated = store.get_item(&item.id).unwrap();
        assert_eq!(updated.uom, "EA");
        assert_eq!(updated.sys_qty, Some(4.0));

        let err = store
            .update_item_text("ITEM-MISSING", ItemField::Uom, "EA")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_stats_counts() {
        let mut store = Store::open_in_memory().unwrap();
        let root = store.insert_node("Plant", None, "Plant", 0, None).unwrap();
        let leaf = store
            .insert_node(
                "pump",
                Some(&root),
                "Plant/pump",
                1,
                Some(&meta_with_name("Pump")),
            )
            .unwrap();
        let sheet = store.insert_sheet(&leaf, "Sheet1", 0).unwrap();
        store
            .insert_items(&leaf, Some(&sheet), &[NewLineItem::default()])
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_nodes, 2);
        assert_eq!(stats.assets, 1);
        assert_eq!(stats.folders, 1);
        assert_eq!(stats.sheets, 1);
        assert_eq!(stats.line_items, 1);
        assert_eq!(stats.nodes_by_level.len(), 2);
    }
}
