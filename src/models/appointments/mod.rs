pub mod appointment;

pub use appointment::{ApiResult, Appointment};
