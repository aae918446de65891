use serde::Serialize;
use serde_json::{Map, Value};

/// One data row keyed by header, in header column order.
pub type SheetRecord = Map<String, Value>;

/// Headers and records pulled from a worksheet.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ExtractedSheet {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub records: Vec<SheetRecord>,
}

impl ExtractedSheet {
    /// First `count` records, for the console preview.
    pub fn sample(&self, count: usize) -> &[SheetRecord] {
        &self.records[..self.records.len().min(count)]
    }
}
