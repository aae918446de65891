use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Unknown workflow step '{0}' (expected Schedule, Reschedule, Complete or Cancel)")]
    UnknownStep(String),

    #[error("Schedule can only be the first step of a workflow")]
    ScheduleNotFirst,

    #[error("Client data has no numeric '{0}' field")]
    MissingNumericField(&'static str),

    #[error("Scenario file holds no scenarios")]
    NoScenarios,
}

/// One transition applied to an appointment; the value doubles as the
/// `dispositionStatus` sent to the API.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum WorkflowStep {
    Schedule,
    Reschedule,
    Complete,
    Cancel,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step_str = match self {
            WorkflowStep::Schedule => "Schedule",
            WorkflowStep::Reschedule => "Reschedule",
            WorkflowStep::Complete => "Complete",
            WorkflowStep::Cancel => "Cancel",
        };
        write!(f, "{}", step_str)
    }
}

impl FromStr for WorkflowStep {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Schedule" => Ok(WorkflowStep::Schedule),
            "Reschedule" => Ok(WorkflowStep::Reschedule),
            "Complete" => Ok(WorkflowStep::Complete),
            "Cancel" => Ok(WorkflowStep::Cancel),
            other => Err(ScenarioError::UnknownStep(other.to_string())),
        }
    }
}

impl TryFrom<String> for WorkflowStep {
    type Error = ScenarioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WorkflowStep> for String {
    fn from(step: WorkflowStep) -> Self {
        step.to_string()
    }
}

impl WorkflowStep {
    /// Fields PATCHed alongside `dispositionStatus` for this step.
    ///
    /// `Complete` derives its totals from the client's `grossRevenue`.
    pub fn update_fields(&self, client_data: &Map<String, Value>) -> Result<Map<String, Value>, ScenarioError> {
        let fields = match self {
            WorkflowStep::Schedule => return Err(ScenarioError::ScheduleNotFirst),
            WorkflowStep::Reschedule => json!({
                "updatedStartDate": "2025-06-15",
                "updatedStartTime": "15:00",
                "updatedEndTime": "16:00"
            }),
            WorkflowStep::Complete => {
                let gross = client_data
                    .get("grossRevenue")
                    .filter(|value| value.is_number())
                    .ok_or(ScenarioError::MissingNumericField("grossRevenue"))?;
                let digital = match gross.as_i64().and_then(|gross| gross.checked_sub(100)) {
                    Some(digital) => json!(digital),
                    None => json!(gross.as_f64().unwrap_or_default() - 100.0),
                };
                json!({
                    "totalCollected": gross,
                    "totalCollectedCash": 100,
                    "totalCollectedDigital": digital,
                    "appointmentNotes": "Appointment completed successfully",
                    "seeClientAgain": true
                })
            }
            WorkflowStep::Cancel => json!({
                "whoCanceled": "client",
                "cancellationDetails": "Client requested cancellation - apply deposit to future booking"
            }),
        };

        match fields {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}
