pub mod results;
pub mod scenario;
pub mod step;

pub use results::WorkflowResults;
pub use scenario::{default_scenarios, load_scenarios, TestScenario};
pub use step::{ScenarioError, WorkflowStep};
