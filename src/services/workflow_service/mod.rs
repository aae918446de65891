pub mod runner;

pub use runner::{run_workflow_suite, WorkflowRunner};
