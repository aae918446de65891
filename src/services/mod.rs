pub mod appointment_service;
pub mod extract_service;
pub mod workflow_service;

pub use appointment_service::ApiClient;
pub use extract_service::{extract_records, extract_workbook, run_extraction, save_records};
pub use workflow_service::{run_workflow_suite, WorkflowRunner};
