pub mod record;

pub use record::{ExtractedSheet, SheetRecord};
