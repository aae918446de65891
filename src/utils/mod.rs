pub mod file_utils;
pub mod log_utils;

pub use file_utils::save_report;
pub use log_utils::init_logging;
