use calendar_audit::config::Settings;
use calendar_audit::error::AuditError;
use calendar_audit::models::{default_scenarios, TestScenario, WorkflowStep};
use calendar_audit::services::{run_workflow_suite, ApiClient, WorkflowRunner};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::fs;
use std::time::Duration;

fn scenario(name: &str) -> TestScenario {
    default_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
        .unwrap()
}

fn runner(server: &MockServer) -> WorkflowRunner {
    WorkflowRunner::new(ApiClient::new(&server.base_url()), Duration::ZERO)
}

#[tokio::test]
async fn rejected_creation_stops_the_scenario() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments");
            then.status(422).json_body(json!({"error": "startDate is required"}));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PATCH).path("/api/appointments/7");
            then.status(200).json_body(json!({"id": 7}));
        })
        .await;

    let passed = runner(&server)
        .run_workflow_test(&scenario("Mary Schedule-Cancel"))
        .await;

    assert!(!passed);
    create.assert_hits_async(1).await;
    assert_eq!(update.hits_async().await, 0);
}

#[tokio::test]
async fn schedule_then_cancel_sends_the_cancellation_fields() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/appointments")
                .json_body_partial(r#"{"clientName": "Mary Schedule-Cancel", "grossRevenue": 350}"#);
            then.status(201).json_body(json!({"id": 7}));
        })
        .await;
    let cancel = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/appointments/7")
                .json_body_partial(r#"{"dispositionStatus": "Cancel", "whoCanceled": "client"}"#);
            then.status(200).json_body(json!({"id": 7, "dispositionStatus": "Cancel"}));
        })
        .await;
    let fetch = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/appointments/7");
            then.status(200)
                .json_body(json!({"id": 7, "calendarEventId": "evt-123"}));
        })
        .await;

    let passed = runner(&server)
        .run_workflow_test(&scenario("Mary Schedule-Cancel"))
        .await;

    assert!(passed);
    create.assert_hits_async(1).await;
    cancel.assert_hits_async(1).await;
    assert!(fetch.hits_async().await >= 2);
}

#[tokio::test]
async fn failed_update_halts_the_remaining_steps() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments");
            then.status(201).json_body(json!({"id": "abc"}));
        })
        .await;
    let reschedule = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/appointments/abc")
                .json_body_partial(r#"{"dispositionStatus": "Reschedule"}"#);
            then.status(500).json_body(json!({"error": "calendar sync failed"}));
        })
        .await;
    let complete = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/appointments/abc")
                .json_body_partial(r#"{"dispositionStatus": "Complete"}"#);
            then.status(200).json_body(json!({"id": "abc"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/appointments/abc");
            then.status(404);
        })
        .await;

    let passed = runner(&server)
        .run_workflow_test(&scenario("Peter Schedule-Reschedule-Complete"))
        .await;

    assert!(!passed);
    reschedule.assert_hits_async(1).await;
    assert_eq!(complete.hits_async().await, 0);
}

#[tokio::test]
async fn failing_diagnostic_fetches_do_not_fail_the_scenario() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments");
            then.status(201).json_body(json!({"id": 9}));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PATCH).path("/api/appointments/9");
            then.status(200).json_body(json!({"id": 9}));
        })
        .await;
    let fetch = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/appointments/9");
            then.status(404).json_body(json!({"error": "not found"}));
        })
        .await;

    let passed = runner(&server)
        .run_workflow_test(&scenario("Paul Schedule-Reschedule-Cancel"))
        .await;

    assert!(passed);
    update.assert_hits_async(2).await;
    fetch.assert_hits_async(3).await;
}

#[tokio::test]
async fn complete_sends_totals_derived_from_gross_revenue() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments");
            then.status(201).json_body(json!({"id": 11}));
        })
        .await;
    let complete = server
        .mock_async(|when, then| {
            when.method(PATCH).path("/api/appointments/11").json_body_partial(
                r#"{"dispositionStatus": "Complete", "totalCollected": 500, "totalCollectedCash": 100, "totalCollectedDigital": 400, "seeClientAgain": true}"#,
            );
            then.status(200).json_body(json!({"id": 11}));
        })
        .await;

    let passed = runner(&server)
        .run_workflow_test(&scenario("John Schedule-Complete"))
        .await;

    assert!(passed);
    complete.assert_hits_async(1).await;
}

#[tokio::test]
async fn transport_errors_become_status_zero() {
    let client = ApiClient::new("http://127.0.0.1:1");
    let result = client.make_request(Method::GET, "/api/appointments/1", None).await;
    assert_eq!(result.status_code, 0);
    assert!(!result.success);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn non_json_bodies_are_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/test/calendar");
            then.status(200).body("<html>ok</html>");
        })
        .await;

    let client = ApiClient::new(&server.base_url());
    assert!(!client.test_calendar_connection().await);
}

#[tokio::test]
async fn update_merges_disposition_status_with_extra_fields() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/appointments/5")
                .json_body(json!({"dispositionStatus": "Reschedule", "note": "moved"}));
            then.status(204);
        })
        .await;

    let mut extra = Map::new();
    extra.insert("note".to_string(), Value::from("moved"));
    let client = ApiClient::new(&server.base_url());
    assert!(client.update_appointment_status("5", WorkflowStep::Reschedule, extra).await);
    update.assert_hits_async(1).await;
}

async fn mock_happy_api(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/test/calendar");
            then.status(200).json_body(json!({"success": true}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments");
            then.status(201).json_body(json!({"id": 7}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PATCH).path("/api/appointments/7");
            then.status(200).json_body(json!({"id": 7}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/appointments/7");
            then.status(200).json_body(json!({"id": 7, "calendarEventId": null}));
        })
        .await;
}

#[tokio::test]
async fn suite_writes_results_for_every_default_scenario() -> Result<(), AuditError> {
    let server = MockServer::start_async().await;
    mock_happy_api(&server).await;

    let dir = tempfile::tempdir()?;
    let results_path = dir.path().join("calendar_test_results.json");
    let settings = Settings {
        base_url: server.base_url(),
        settle_delay: Duration::ZERO,
        results_path: results_path.clone(),
        ..Settings::default()
    };

    let results = run_workflow_suite(&settings).await?;
    assert!(results.all_passed());

    let written: Value = serde_json::from_str(&fs::read_to_string(&results_path)?)?;
    assert_eq!(
        written,
        json!({
            "calendar_connection": true,
            "workflows": {
                "John Schedule-Complete": true,
                "Peter Schedule-Reschedule-Complete": true,
                "Paul Schedule-Reschedule-Cancel": true,
                "Mary Schedule-Cancel": true
            }
        })
    );
    Ok(())
}

#[tokio::test]
async fn suite_runs_scenarios_from_a_file() -> Result<(), AuditError> {
    let server = MockServer::start_async().await;
    mock_happy_api(&server).await;

    let dir = tempfile::tempdir()?;
    let scenarios_path = dir.path().join("scenarios.json");
    fs::write(
        &scenarios_path,
        json!([{
            "name": "Ada Schedule-Reschedule",
            "workflow": ["Schedule", "Reschedule"],
            "client_data": {"clientName": "Ada", "grossRevenue": 250}
        }])
        .to_string(),
    )?;
    let settings = Settings {
        base_url: server.base_url(),
        settle_delay: Duration::ZERO,
        results_path: dir.path().join("results.json"),
        scenarios_path: Some(scenarios_path),
        ..Settings::default()
    };

    let results = run_workflow_suite(&settings).await?;
    assert_eq!(results.workflows, vec![("Ada Schedule-Reschedule".to_string(), true)]);
    assert!(results.calendar_connection);
    Ok(())
}

#[tokio::test]
async fn suite_records_failures_when_the_api_is_down() -> Result<(), AuditError> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/test/calendar");
            then.status(500).json_body(json!({"error": "no credentials"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/appointments");
            then.status(503).json_body(json!({"error": "unavailable"}));
        })
        .await;

    let dir = tempfile::tempdir()?;
    let results_path = dir.path().join("calendar_test_results.json");
    let settings = Settings {
        base_url: server.base_url(),
        settle_delay: Duration::ZERO,
        results_path: results_path.clone(),
        ..Settings::default()
    };

    let results = run_workflow_suite(&settings).await?;
    assert!(!results.all_passed());

    let written: Value = serde_json::from_str(&fs::read_to_string(&results_path)?)?;
    assert_eq!(
        written,
        json!({
            "calendar_connection": false,
            "workflows": {
                "John Schedule-Complete": false,
                "Peter Schedule-Reschedule-Complete": false,
                "Paul Schedule-Reschedule-Cancel": false,
                "Mary Schedule-Cancel": false
            }
        })
    );
    Ok(())
}
