//! # Spreadsheet reading
//!
//! Minimal reader for Office Open XML workbooks (`.xlsx` / `.xlsm`). It
//! resolves the workbook's sheets, shared strings and date formats, and
//! loads one worksheet into a [`Sheet`] grid for the record extractor.
pub mod cell;
mod package;
mod reference;
pub mod sheet;
pub mod workbook;
pub(crate) mod xml;

pub use cell::Cell;
pub use sheet::Sheet;
pub use workbook::Workbook;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Spreadsheet '{0}' is password protected or in the legacy .xls format")]
    UnsupportedFormat(String),

    #[error("Spreadsheet '{0}' contains no worksheets")]
    NoWorksheets(String),

    #[error("Worksheet '{1}' not found in '{0}'")]
    WorksheetNotFound(String, String),

    #[error("Required part '{0}' is missing from the workbook package")]
    MissingPart(String),

    #[error("Shared string index {0} is out of range")]
    SharedStringOutOfRange(usize),

    #[error("Cell {0} holds '{1}', which is not a valid {2}")]
    InvalidCellValue(String, String, &'static str),
}
