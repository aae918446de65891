use crate::config::Settings;
use crate::error::AuditError;
use crate::models::{ExtractedSheet, SheetRecord};
use crate::spreadsheet::{Cell, Sheet, Workbook};
use crate::utils::save_report;
use log::{debug, info};
use serde_json::Value;
use std::path::Path;

/// Zips the header row with every following row.
///
/// Header columns whose cell is empty are left out of the header list and
/// of every record. Rows with no value in any column are skipped; missing
/// cells under a header become `null`.
pub fn extract_records(sheet: &Sheet) -> Result<ExtractedSheet, AuditError> {
    let mut header_columns: Vec<(usize, String)> = Vec::new();
    for (col, cell) in sheet.row(0).iter().enumerate() {
        if let Some(cell) = cell.as_ref().filter(|cell| !cell.is_empty()) {
            header_columns.push((col, header_text(cell)?));
        }
    }

    let mut records: Vec<SheetRecord> = Vec::new();
    for row in 1..sheet.row_count() {
        let is_empty_row = sheet
            .row(row)
            .iter()
            .all(|cell| cell.as_ref().map_or(true, Cell::is_empty));
        if is_empty_row {
            debug!("Skipping empty row {}", row + 1);
            continue;
        }

        let mut record = SheetRecord::new();
        for (col, header) in &header_columns {
            let value = match sheet.get(row, *col) {
                Some(cell) => cell.to_json()?,
                None => Value::Null,
            };
            record.insert(header.to_owned(), value);
        }
        records.push(record);
    }

    Ok(ExtractedSheet {
        sheet_name: sheet.name.to_owned(),
        headers: header_columns.into_iter().map(|(_, header)| header).collect(),
        records,
    })
}

/// Header keys are text; other cell kinds use their JSON rendering.
fn header_text(cell: &Cell) -> Result<String, AuditError> {
    Ok(match cell.to_json()? {
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Reads the active sheet of the workbook at `path`.
pub fn extract_workbook<P: AsRef<Path>>(path: P) -> Result<ExtractedSheet, AuditError> {
    let mut workbook = Workbook::open(path)?;
    let sheet = workbook.read_active_sheet()?;
    info!(
        "Reading sheet '{}' of {} ({} sheet(s) in workbook)",
        sheet.name,
        workbook.path,
        workbook.sheet_names().len()
    );
    extract_records(&sheet)
}

pub fn save_records<P: AsRef<Path>>(path: P, records: &[SheetRecord]) -> Result<(), AuditError> {
    save_report(path, &records)
}

/// The whole extractor run: read, write the fixture, print a preview.
pub fn run_extraction(settings: &Settings) -> Result<ExtractedSheet, AuditError> {
    let extracted = extract_workbook(&settings.sheet_path)?;
    save_records(&settings.sheet_output_path, &extracted.records)?;
    info!(
        "Wrote {} record(s) to {}",
        extracted.records.len(),
        settings.sheet_output_path.display()
    );

    println!("Extracted {} rows of test data", extracted.records.len());
    println!("Headers: {}", serde_json::to_string(&extracted.headers)?);
    if extracted.records.is_empty() {
        println!("Sample data: No data");
    } else {
        println!("Sample data: {}", serde_json::to_string_pretty(extracted.sample(3))?);
    }
    Ok(extracted)
}
