//! Workbook reading and row extraction
//!
//! Metadata comes from a heuristic label scan over the header region of the
//! first sheet: a row whose first cell contains a known field label
//! (case-insensitive) contributes its second cell's value. Line items come
//! from a header-driven read of every sheet, first row taken as column
//! titles. Both parsers operate on `calamine::Range` values so they can be
//! exercised without fixture files.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

use crate::core::store::{AssetMetadata, NewLineItem};

/// Rows scanned for metadata labels at the top of the first sheet
const METADATA_ROW_SCAN: usize = 20;

/// Errors raised while reading a workbook
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("cannot read workbook '{path}': {message}")]
    Unreadable { path: String, message: String },

    #[error("workbook '{path}' contains no sheets")]
    NoSheets { path: String },
}

/// One parsed workbook tab
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub name: String,
    /// Zero-based native position within the workbook
    pub index: usize,
    pub items: Vec<NewLineItem>,
}

/// A fully parsed workbook: header metadata plus per-sheet line items
#[derive(Debug, Clone)]
pub struct ParsedWorkbook {
    pub metadata: AssetMetadata,
    pub sheets: Vec<ParsedSheet>,
}

/// Read and parse a workbook file (.xlsx or .xls)
pub fn read_workbook(path: &Path) -> Result<ParsedWorkbook, WorkbookError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| WorkbookError::Unreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.is_empty() {
        return Err(WorkbookError::NoSheets {
            path: path.display().to_string(),
        });
    }

    let mut metadata = AssetMetadata::default();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for (index, name) in sheet_names.iter().enumerate() {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| WorkbookError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if index == 0 {
            metadata = parse_metadata(&range);
        }

        sheets.push(ParsedSheet {
            name: name.clone(),
            index,
            items: parse_sheet_rows(&range),
        });
    }

    Ok(ParsedWorkbook { metadata, sheets })
}

/// Scan the header region of the first sheet for metadata labels.
///
/// A label that never appears is silently omitted, never an error.
pub fn parse_metadata(range: &Range<Data>) -> AssetMetadata {
    let mut metadata = AssetMetadata::default();

    for row in range.rows().take(METADATA_ROW_SCAN) {
        let Some(first) = row.first() else { continue };
        let label = cell_text(first);
        let label = label.trim();
        if label.is_empty() {
            continue;
        }

        let value = row.get(1).map(cell_text).unwrap_or_default();
        apply_metadata_field(&mut metadata, label, value.trim());
    }

    metadata
}

/// Bind a label row's value to the matching metadata field, if any.
/// First matching field in declaration order wins for a row.
fn apply_metadata_field(metadata: &mut AssetMetadata, label: &str, value: &str) {
    let label = label.to_lowercase();

    if label.contains("assembly name") {
        set_text(&mut metadata.assembly_name, value);
    } else if label.contains("assembly manufacturer") {
        set_text(&mut metadata.assembly_manufacturer, value);
    } else if label.contains("description") {
        set_text(&mut metadata.description, value);
    } else if label.contains("system") {
        set_text(&mut metadata.system, value);
    } else if label.contains("rebuild item") {
        set_text(&mut metadata.rebuild_item, value);
    } else if label.contains("asset number") {
        set_text(&mut metadata.asset_number, value);
    } else if label.contains("approval date") {
        set_text(&mut metadata.approval_date, value);
    } else if label.contains("total cost") {
        // Monetary field: non-negative or absent
        metadata.total_cost = parse_number_text(value).filter(|c| *c >= 0.0);
    }
}

fn set_text(slot: &mut Option<String>, value: &str) {
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

/// Extract line items from a tabular sheet, first row taken as column titles.
///
/// Missing columns yield empty/absent values; a sheet with no data rows is
/// valid and yields no items.
pub fn parse_sheet_rows(range: &Range<Data>) -> Vec<NewLineItem> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let columns = build_column_map(header);

    let mut items = Vec::new();
    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        items.push(NewLineItem {
            item_no: field_text(&columns, row, "item no."),
            description: field_text(&columns, row, "description"),
            details: field_text(&columns, row, "details"),
            manufacturer: field_text(&columns, row, "manufacturer"),
            part_number: field_text(&columns, row, "part number"),
            item_code: field_text(&columns, row, "item code"),
            uom: field_text(&columns, row, "uom"),
            sys_qty: field_number(&columns, row, "sys qty"),
            cost: field_number(&columns, row, "cost"),
        });
    }

    items
}

/// Build a map from lowercased column title to column index
fn build_column_map(header: &[Data]) -> HashMap<String, usize> {
    header
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| {
            let title = cell_text(cell).trim().to_lowercase();
            if title.is_empty() {
                None
            } else {
                Some((title, i))
            }
        })
        .collect()
}

fn field_text(columns: &HashMap<String, usize>, row: &[Data], title: &str) -> String {
    columns
        .get(title)
        .and_then(|&i| row.get(i))
        .map(|cell| cell_text(cell).trim().to_string())
        .unwrap_or_default()
}

/// Numeric cells parse as f64; anything unparseable fails soft to None
fn field_number(columns: &HashMap<String, usize>, row: &[Data], title: &str) -> Option<f64> {
    columns
        .get(title)
        .and_then(|&i| row.get(i))
        .and_then(cell_number)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    }
}

fn parse_number_text(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}
