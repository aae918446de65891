use crate::error::AuditError;
use crate::models::{ApiResult, Appointment, WorkflowStep};
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{Map, Value};

/// Thin client over the appointment API.
///
/// Every call goes through [`ApiClient::make_request`], which never fails:
/// transport and decoding errors come back as an [`ApiResult`] with status 0.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiClient {
        ApiClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn make_request(&self, method: Method, endpoint: &str, data: Option<&Value>) -> ApiResult {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = data {
            request = request.json(body);
        }

        match execute(request).await {
            Ok(result) => {
                debug!("{} {} -> {}", method, url, result.status_code);
                result
            }
            Err(e) => {
                warn!("{} {} failed: {}", method, url, e);
                ApiResult::from_error(e)
            }
        }
    }

    /// Asks the service to verify its calendar credentials.
    pub async fn test_calendar_connection(&self) -> bool {
        println!("=== Testing Google Calendar Connection ===");
        let result = self.make_request(Method::POST, "/api/test/calendar", None).await;
        println!("Calendar Test Result: {}", describe(&result));
        result.success
    }

    /// Creates an appointment and returns its id, `None` when the API
    /// rejects it or answers without an id.
    pub async fn create_appointment(&self, client_data: &Map<String, Value>) -> Option<String> {
        let client_name = client_data
            .get("clientName")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        println!("\n--- Creating appointment for {} ---", client_name);

        let payload = Value::Object(client_data.clone());
        let result = self.make_request(Method::POST, "/api/appointments", Some(&payload)).await;
        match result.record_id() {
            Some(id) if result.success => {
                println!("✅ Created appointment ID: {}", id);
                Some(id)
            }
            _ => {
                println!("❌ Failed to create appointment: {}", describe(&result));
                None
            }
        }
    }

    /// PATCHes `dispositionStatus` to `step`, merged with the step's extra fields.
    pub async fn update_appointment_status(
        &self,
        appointment_id: &str,
        step: WorkflowStep,
        additional_data: Map<String, Value>,
    ) -> bool {
        let mut update_data = Map::new();
        update_data.insert("dispositionStatus".to_string(), Value::String(step.to_string()));
        update_data.extend(additional_data);

        println!("\n--- Updating appointment {} to {} ---", appointment_id, step);
        let endpoint = format!("/api/appointments/{}", appointment_id);
        let result = self
            .make_request(Method::PATCH, &endpoint, Some(&Value::Object(update_data)))
            .await;
        if result.success {
            println!("✅ Updated appointment to {}", step);
            true
        } else {
            println!("❌ Failed to update appointment: {}", describe(&result));
            false
        }
    }

    pub async fn get_appointment(&self, appointment_id: &str) -> Option<Appointment> {
        let endpoint = format!("/api/appointments/{}", appointment_id);
        let result = self.make_request(Method::GET, &endpoint, None).await;
        if !result.success {
            return None;
        }
        match serde_json::from_value::<Appointment>(result.data?) {
            Ok(appointment) => Some(appointment),
            Err(e) => {
                warn!("Appointment {} has an unexpected shape: {}", appointment_id, e);
                None
            }
        }
    }
}

async fn execute(request: RequestBuilder) -> Result<ApiResult, AuditError> {
    let response = request.send().await?;
    let status_code = response.status().as_u16();
    let body = response.bytes().await?;
    let data = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice::<Value>(&body)?)
    };
    Ok(ApiResult::from_response(status_code, data))
}

fn describe(result: &ApiResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|_| format!("{:?}", result))
}
