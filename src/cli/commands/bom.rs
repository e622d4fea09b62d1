//! `bomvault bom` commands - BOM line item operations
//!
//! `list` renders the per-sheet line item tables of an asset, `edit`
//! updates a single field of one item, `export` writes the items as CSV.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{effective_format, open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::store::{ItemField, LineItemRow, SheetRow, Store};

#[derive(clap::Subcommand, Debug)]
pub enum BomCommands {
    /// List line items of an asset, grouped per sheet
    List(BomListArgs),

    /// Edit a single field of a line item
    Edit(BomEditArgs),

    /// Export line items of an asset as CSV
    Export(BomExportArgs),
}

pub fn run(cmd: BomCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BomCommands::List(args) => list(args, global),
        BomCommands::Edit(args) => edit(args, global),
        BomCommands::Export(args) => export(args, global),
    }
}

// =========================================================================
// bom list
// =========================================================================

#[derive(clap::Args, Debug)]
pub struct BomListArgs {
    /// Asset node id or path
    pub asset: String,

    /// Only show the sheet at this zero-based index
    #[arg(long)]
    pub sheet: Option<i64>,
}

fn list(args: BomListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load(Some(&project));
    let store = Store::open(&project).into_diagnostic()?;

    let node = store.resolve_node(&args.asset).into_diagnostic()?;
    let sheets = store.list_sheets(&node.id).into_diagnostic()?;
    let items = store.list_items(&node.id).into_diagnostic()?;

    match effective_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "asset": node.id, "items": items });
            println!("{}", serde_json::to_string_pretty(&payload).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            let payload = serde_json::json!({ "asset": node.id, "items": items });
            println!("{}", serde_yml::to_string(&payload).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Csv => {
            let mut out = Vec::new();
            write_items_csv(&mut out, &sheets, &items).into_diagnostic()?;
            print!("{}", String::from_utf8_lossy(&out));
            return Ok(());
        }
        OutputFormat::Tsv => {
            for item in &items {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    item.id,
                    item.item_no,
                    item.description,
                    item.details,
                    item.manufacturer,
                    item.part_number,
                    item.item_code,
                    item.uom,
                    item.sys_qty.map(|v| v.to_string()).unwrap_or_default(),
                    item.cost.map(|v| v.to_string()).unwrap_or_default(),
                );
            }
            return Ok(());
        }
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.id);
            }
            return Ok(());
        }
        _ => {}
    }

    // Human-readable per-sheet tables
    let markdown = effective_format(global, &config, OutputFormat::Auto) == OutputFormat::Md;
    println!("{}", style(&node.name).bold());
    println!("{} items", items.len());

    if items.is_empty() && sheets.is_empty() {
        println!();
        println!("No BOM items found for this asset");
        return Ok(());
    }

    let mut grouped: HashMap<Option<String>, Vec<&LineItemRow>> = HashMap::new();
    for item in &items {
        grouped.entry(item.sheet_id.clone()).or_default().push(item);
    }

    for sheet in &sheets {
        if let Some(wanted) = args.sheet {
            if sheet.sheet_index != wanted {
                continue;
            }
        }

        let sheet_items = grouped.get(&Some(sheet.id.clone()));
        println!();
        println!(
            "{} ({} items)",
            style(format!("Sheet {}: {}", sheet.sheet_index, sheet.sheet_name)).bold(),
            sheet_items.map(|v| v.len()).unwrap_or(0)
        );

        match sheet_items {
            // Distinct empty state: the sheet exists but carried no rows
            // (e.g. an image-only tab)
            None => println!("{}", style("  (sheet recorded empty - no line items)").dim()),
            Some(rows) => print_item_table(rows, markdown),
        }
    }

    // Legacy rows from pre-sheet uploads fall under a synthetic group
    if args.sheet.is_none() {
        if let Some(rows) = grouped.get(&None) {
            println!();
            println!(
                "{} ({} items)",
                style("(ungrouped)").bold(),
                rows.len()
            );
            print_item_table(rows, markdown);
        }
    }

    Ok(())
}

fn print_item_table(rows: &[&LineItemRow], markdown: bool) {
    let mut builder = Builder::default();
    builder.push_record([
        "ID", "Item No.", "Description", "Details", "Manufacturer", "Part Number", "Item Code",
        "UOM", "Sys Qty", "Cost",
    ]);

    for item in rows {
        builder.push_record([
            item.id.clone(),
            item.item_no.clone(),
            truncate_str(&item.description, 32),
            truncate_str(&item.details, 24),
            truncate_str(&item.manufacturer, 20),
            item.part_number.clone(),
            item.item_code.clone(),
            item.uom.clone(),
            item.sys_qty.map(|v| v.to_string()).unwrap_or_default(),
            item.cost.map(|v| format!("{v:.2}")).unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::sharp());
    }
    println!("{table}");
}

// =========================================================================
// bom edit
// =========================================================================

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EditField {
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

impl EditField {
    fn as_item_field(self) -> ItemField {
        match self {
            EditField::ItemNo => ItemField::ItemNo,
            EditField::Description => ItemField::Description,
            EditField::Details => ItemField::Details,
            EditField::Manufacturer => ItemField::Manufacturer,
            EditField::PartNumber => ItemField::PartNumber,
            EditField::ItemCode => ItemField::ItemCode,
            EditField::Uom => ItemField::Uom,
            EditField::SysQty => ItemField::SysQty,
            EditField::Cost => ItemField::Cost,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct BomEditArgs {
    /// Line item id
    pub item: String,

    /// Field to change
    #[arg(long)]
    pub field: EditField,

    /// New value (empty clears numeric fields)
    #[arg(long)]
    pub value: String,
}

fn edit(args: BomEditArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let store = Store::open(&project).into_diagnostic()?;

    // Resolve first so a vanished id fails before any write
    let item = store.get_item(&args.item).into_diagnostic()?;
    let field = args.field.as_item_field();

    if field.is_numeric() {
        let value = if args.value.trim().is_empty() {
            None
        } else {
            Some(args.value.trim().parse::<f64>().map_err(|_| {
                miette::miette!("field '{}' requires a numeric value, got '{}'", field.column(), args.value)
            })?)
        };
        store
            .update_item_number(&item.id, field, value)
            .into_diagnostic()?;
    } else {
        store
            .update_item_text(&item.id, field, args.value.trim())
            .into_diagnostic()?;
    }

    // Report the value the store actually holds, not the one we sent
    let updated = store.get_item(&item.id).into_diagnostic()?;
    let shown = match field {
        ItemField::ItemNo => updated.item_no,
        ItemField::Description => updated.description,
        ItemField::Details => updated.details,
        ItemField::Manufacturer => updated.manufacturer,
        ItemField::PartNumber => updated.part_number,
        ItemField::ItemCode => updated.item_code,
        ItemField::Uom => updated.uom,
        ItemField::SysQty => updated.sys_qty.map(|v| v.to_string()).unwrap_or_default(),
        ItemField::Cost => updated.cost.map(|v| v.to_string()).unwrap_or_default(),
    };

    println!(
        "{} Updated {} of {} to '{}'",
        style("✓").green(),
        style(field.column()).cyan(),
        item.id,
        shown
    );
    Ok(())
}

// =========================================================================
// bom export
// =========================================================================

#[derive(clap::Args, Debug)]
pub struct BomExportArgs {
    /// Asset node id or path
    pub asset: String,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

fn export(args: BomExportArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let store = Store::open(&project).into_diagnostic()?;

    let node = store.resolve_node(&args.asset).into_diagnostic()?;
    let sheets = store.list_sheets(&node.id).into_diagnostic()?;
    let items = store.list_items(&node.id).into_diagnostic()?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            write_items_csv(file, &sheets, &items).into_diagnostic()?;
            println!(
                "{} Exported {} item(s) to {}",
                style("✓").green(),
                items.len(),
                style(path.display()).cyan()
            );
        }
        None => {
            let mut out = Vec::new();
            write_items_csv(&mut out, &sheets, &items).into_diagnostic()?;
            print!("{}", String::from_utf8_lossy(&out));
        }
    }

    Ok(())
}

fn write_items_csv<W: Write>(
    writer: W,
    sheets: &[SheetRow],
    items: &[LineItemRow],
) -> csv::Result<()> {
    let sheet_names: HashMap<&str, &str> = sheets
        .iter()
        .map(|s| (s.id.as_str(), s.sheet_name.as_str()))
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "sheet", "item_no", "description", "details", "manufacturer", "part_number",
        "item_code", "uom", "sys_qty", "cost",
    ])?;

    for item in items {
        let sheet = item
            .sheet_id
            .as_deref()
            .and_then(|id| sheet_names.get(id).copied())
            .unwrap_or("");
        wtr.write_record([
            sheet.to_string(),
            item.item_no.clone(),
            item.description.clone(),
            item.details.clone(),
            item.manufacturer.clone(),
            item.part_number.clone(),
            item.item_code.clone(),
            item.uom.clone(),
            item.sys_qty.map(|v| v.to_string()).unwrap_or_default(),
            item.cost.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
