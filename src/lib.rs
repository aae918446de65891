//! Calendar-integration audit tooling.
//!
//! Two entry points share this library: `extract_excel` turns the active
//! sheet of a workbook into JSON test fixtures, and `calendar_workflows`
//! replays appointment lifecycles against the scheduling API and records
//! which ones completed.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod spreadsheet;
pub mod utils;

pub use config::Settings;
pub use error::AuditError;
