// src/models/mod.rs

pub mod appointments;
pub mod sheet;
pub mod workflow;

pub use appointments::{ApiResult, Appointment};
pub use sheet::{ExtractedSheet, SheetRecord};
pub use workflow::{
    default_scenarios, load_scenarios, ScenarioError, TestScenario, WorkflowResults, WorkflowStep,
};
