//! Store row types and query result structs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =========================================================================
// Hierarchy Rows
// =========================================================================

/// Metadata parsed from the header region of an uploaded workbook.
///
/// Carried only by leaf nodes; intermediate folder nodes hold none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly_manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuild_item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    /// Reference to the retained original workbook blob
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_blob: Option<String>,
    /// SHA-256 of the retained workbook content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl AssetMetadata {
    /// True when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.assembly_name.is_none()
            && self.assembly_manufacturer.is_none()
            && self.description.is_none()
            && self.system.is_none()
            && self.rebuild_item.is_none()
            && self.asset_number.is_none()
            && self.approval_date.is_none()
            && self.total_cost.is_none()
            && self.source_blob.is_none()
            && self.source_hash.is_none()
    }
}

/// One folder or leaf-asset entry in the path tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    /// Full "/"-joined path; unique across all nodes
    pub path: String,
    /// Zero-based depth of `path`
    pub level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AssetMetadata>,
    pub created: DateTime<Utc>,
}

impl HierarchyNode {
    /// True for nodes created from an uploaded workbook
    pub fn is_asset(&self) -> bool {
        self.metadata.is_some()
    }
}

// =========================================================================
// Sheet and Line Item Rows
// =========================================================================

/// One tab of an uploaded workbook, in native order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    pub id: String,
    pub asset_id: String,
    pub sheet_name: String,
    /// Zero-based position within the source workbook
    pub sheet_index: i64,
}

/// One BOM row belonging to a sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineItemRow {
    pub id: String,
    pub asset_id: String,
    /// None marks legacy/ungrouped rows from pre-sheet uploads
    pub sheet_id: Option<String>,
    pub item_no: String,
    pub description: String,
    pub details: String,
    pub manufacturer: String,
    pub part_number: String,
    pub item_code: String,
    pub uom: String,
    pub sys_qty: Option<f64>,
    pub cost: Option<f64>,
}

/// Insert payload for a line item (ids are assigned by the store)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLineItem {
    pub item_no: String,
    pub description: String,
    pub details: String,
    pub manufacturer: String,
    pub part_number: String,
    pub item_code: String,
    pub uom: String,
    pub sys_qty: Option<f64>,
    pub cost: Option<f64>,
}

/// Editable line item fields, mapped to their store columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    ItemNo,
    Description,
    Details,
    Manufacturer,
    PartNumber,
    ItemCode,
    Uom,
    SysQty,
    Cost,
}

impl ItemField {
    pub fn column(&self) -> &'static str {
        match self {
            ItemField::ItemNo => "item_no",
            ItemField::Description => "description",
            ItemField::Details => "details",
            ItemField::Manufacturer => "manufacturer",
            ItemField::PartNumber => "part_number",
            ItemField::ItemCode => "item_code",
            ItemField::Uom => "uom",
            ItemField::SysQty => "sys_qty",
            ItemField::Cost => "cost",
        }
    }

    /// Fields stored as REAL rather than TEXT
    pub fn is_numeric(&self) -> bool {
        matches!(self, ItemField::SysQty | ItemField::Cost)
    }
}

// =========================================================================
// Aggregate Query Result Types
// =========================================================================

/// Count of nodes grouped by hierarchy level
#[derive(Debug, Clone, Serialize)]
pub struct LevelCount {
    pub level: i64,
    pub count: usize,
}

/// Store-wide statistics
#[derive(Debug, Default, Serialize)]
pub struct StoreStats {
    pub total_nodes: usize,
    pub assets: usize,
    pub folders: usize,
    pub sheets: usize,
    pub line_items: usize,
    pub nodes_by_level: Vec<LevelCount>,
}
