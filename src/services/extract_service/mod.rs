pub mod extract;

pub use extract::{extract_records, extract_workbook, run_extraction, save_records};
