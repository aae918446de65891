use crate::config::Settings;
use crate::error::AuditError;
use crate::models::{default_scenarios, load_scenarios, TestScenario, WorkflowResults};
use crate::services::appointment_service::ApiClient;
use crate::utils::save_report;
use log::{error, info, warn};
use std::time::Duration;

/// Drives scenarios against the API one after another.
pub struct WorkflowRunner {
    api: ApiClient,
    settle_delay: Duration,
}

impl WorkflowRunner {
    pub fn new(api: ApiClient, settle_delay: Duration) -> WorkflowRunner {
        WorkflowRunner { api, settle_delay }
    }

    /// Creates the appointment, then applies every step after the first.
    ///
    /// Returns true only if every create/update call succeeded; the
    /// diagnostic re-fetches never affect the outcome.
    pub async fn run_workflow_test(&self, scenario: &TestScenario) -> bool {
        println!("\n{}", "=".repeat(60));
        println!("TESTING WORKFLOW: {}", scenario.name);
        println!("Expected workflow: {}", scenario.workflow_label());
        println!("{}", "=".repeat(60));

        let appointment_id = match self.api.create_appointment(&scenario.client_data).await {
            Some(id) => id,
            None => {
                println!("❌ WORKFLOW FAILED: Could not create appointment");
                error!(
                    "Scenario '{}' failed at creation for client {}",
                    scenario.name,
                    scenario.client_name()
                );
                return false;
            }
        };

        self.settle_and_inspect(&appointment_id, "Calendar Event ID").await;

        for step in scenario.workflow.iter().skip(1) {
            let success = match step.update_fields(&scenario.client_data) {
                Ok(fields) => {
                    self.api
                        .update_appointment_status(&appointment_id, *step, fields)
                        .await
                }
                Err(e) => {
                    warn!("Scenario '{}' cannot apply {}: {}", scenario.name, step, e);
                    false
                }
            };

            if !success {
                println!("❌ WORKFLOW FAILED at step: {}", step);
                error!("Scenario '{}' failed at step {}", scenario.name, step);
                return false;
            }

            self.settle_and_inspect(&appointment_id, "Updated Calendar Event ID").await;
        }

        println!("✅ WORKFLOW COMPLETED: {}", scenario.name);
        info!("Scenario '{}' completed", scenario.name);
        true
    }

    /// Connection check first, then each scenario in order.
    pub async fn run_all(&self, scenarios: &[TestScenario]) -> WorkflowResults {
        let calendar_connected = self.api.test_calendar_connection().await;
        let mut results = WorkflowResults::new(calendar_connected);

        for scenario in scenarios {
            let success = self.run_workflow_test(scenario).await;
            results.record(&scenario.name, success);
        }
        results
    }

    /// Waits for the service's asynchronous calendar sync, then logs what the
    /// appointment looks like now.
    async fn settle_and_inspect(&self, appointment_id: &str, label: &str) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        if let Some(appointment) = self.api.get_appointment(appointment_id).await {
            println!("📅 {}: {}", label, appointment.calendar_event_label());
        }
    }
}

/// The whole tester run: scenarios, summary, results file.
pub async fn run_workflow_suite(settings: &Settings) -> Result<WorkflowResults, AuditError> {
    let scenarios = match &settings.scenarios_path {
        Some(path) => {
            info!("Loading scenarios from {}", path.display());
            load_scenarios(path)?
        }
        None => default_scenarios(),
    };

    println!("🔍 GOOGLE CALENDAR INTEGRATION AUDIT");
    println!("{}", "=".repeat(50));
    info!(
        "Running {} scenario(s) against {}",
        scenarios.len(),
        settings.base_url
    );

    let runner = WorkflowRunner::new(ApiClient::new(&settings.base_url), settings.settle_delay);
    let results = runner.run_all(&scenarios).await;
    results.print_summary();

    save_report(&settings.results_path, &results)?;
    println!(
        "\n📊 Detailed results saved to {}",
        settings.results_path.display()
    );
    Ok(results)
}
