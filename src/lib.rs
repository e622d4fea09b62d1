//! bomvault: BOM workbook vault
//!
//! A toolkit for ingesting spreadsheet workbooks that describe equipment
//! Bills of Materials and browsing the result as a navigable asset
//! hierarchy with per-sheet line item tables.

pub mod cli;
pub mod core;
pub mod tree;
