use crate::error::AuditError;
use crate::models::workflow::step::{ScenarioError, WorkflowStep};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A named test case: the payload that creates the appointment and the
/// steps expected to be applied to it, in order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestScenario {
    pub name: String,
    pub workflow: Vec<WorkflowStep>,
    pub client_data: Map<String, Value>,
}

impl TestScenario {
    /// "Schedule → Reschedule → Complete"
    pub fn workflow_label(&self) -> String {
        self.workflow
            .iter()
            .map(WorkflowStep::to_string)
            .collect::<Vec<_>>()
            .join(" → ")
    }

    pub fn client_name(&self) -> &str {
        self.client_data
            .get("clientName")
            .and_then(Value::as_str)
            .unwrap_or(&self.name)
    }
}

fn scenario(name: &str, workflow: &[WorkflowStep], client_data: Value) -> TestScenario {
    TestScenario {
        name: name.to_string(),
        workflow: workflow.to_vec(),
        client_data: match client_data {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    }
}

/// The four built-in client journeys.
pub fn default_scenarios() -> Vec<TestScenario> {
    use WorkflowStep::*;

    vec![
        scenario(
            "John Schedule-Complete",
            &[Schedule, Complete],
            json!({
                "clientName": "John Schedule-Complete",
                "phoneNumber": "555-0001",
                "clientEmail": "john.test@example.com",
                "startDate": "2025-06-08",
                "startTime": "14:00",
                "endTime": "15:00",
                "callType": "out-call",
                "streetAddress": "123 Test St",
                "city": "Los Angeles",
                "state": "CA",
                "zipCode": "90210",
                "grossRevenue": 500,
                "depositAmount": 200,
                "paymentProcessUsed": "CashApp",
                "marketingChannel": "Website",
                "setBy": "Test User",
                "provider": "Service Provider"
            }),
        ),
        scenario(
            "Peter Schedule-Reschedule-Complete",
            &[Schedule, Reschedule, Complete],
            json!({
                "clientName": "Peter Schedule-Reschedule-Complete",
                "phoneNumber": "555-0002",
                "clientEmail": "peter.test@example.com",
                "startDate": "2025-06-09",
                "startTime": "16:00",
                "endTime": "17:00",
                "callType": "in-call",
                "grossRevenue": 400,
                "depositAmount": 150,
                "paymentProcessUsed": "Zelle",
                "marketingChannel": "Referral",
                "setBy": "Test User",
                "provider": "Service Provider"
            }),
        ),
        scenario(
            "Paul Schedule-Reschedule-Cancel",
            &[Schedule, Reschedule, Cancel],
            json!({
                "clientName": "Paul Schedule-Reschedule-Cancel",
                "phoneNumber": "555-0003",
                "clientEmail": "paul.test@example.com",
                "startDate": "2025-06-10",
                "startTime": "18:00",
                "endTime": "19:00",
                "callType": "out-call",
                "streetAddress": "456 Demo Ave",
                "city": "Beverly Hills",
                "state": "CA",
                "zipCode": "90211",
                "grossRevenue": 600,
                "depositAmount": 250,
                "paymentProcessUsed": "Venmo",
                "marketingChannel": "Social Media",
                "setBy": "Test User",
                "provider": "Service Provider"
            }),
        ),
        scenario(
            "Mary Schedule-Cancel",
            &[Schedule, Cancel],
            json!({
                "clientName": "Mary Schedule-Cancel",
                "phoneNumber": "555-0004",
                "clientEmail": "mary.test@example.com",
                "startDate": "2025-06-11",
                "startTime": "12:00",
                "endTime": "13:00",
                "callType": "in-call",
                "grossRevenue": 350,
                "depositAmount": 100,
                "paymentProcessUsed": "Cash",
                "marketingChannel": "Walk-in",
                "setBy": "Test User",
                "provider": "Service Provider"
            }),
        ),
    ]
}

/// Reads scenarios from a JSON array of `{name, workflow, client_data}`.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<TestScenario>, AuditError> {
    let file = File::open(path)?;
    let scenarios: Vec<TestScenario> = serde_json::from_reader(BufReader::new(file))?;
    if scenarios.is_empty() {
        return Err(ScenarioError::NoScenarios.into());
    }
    Ok(scenarios)
}
