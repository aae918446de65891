use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a single call against the appointment API.
///
/// Transport and decoding failures never escape as errors: they are folded
/// into a result with `status_code` 0 and `success` false.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResult {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl ApiResult {
    pub fn from_response(status_code: u16, data: Option<Value>) -> ApiResult {
        ApiResult {
            status_code,
            data,
            error: None,
            success: status_code < 400,
        }
    }

    pub fn from_error(error: impl ToString) -> ApiResult {
        ApiResult {
            status_code: 0,
            data: None,
            error: Some(error.to_string()),
            success: false,
        }
    }

    /// The `id` of the returned record, as text.
    pub fn record_id(&self) -> Option<String> {
        match self.data.as_ref()?.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.to_owned()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// The fields of an appointment this tool looks at; everything else the API
/// returns is kept untouched in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[allow(non_snake_case)]
pub struct Appointment {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub dispositionStatus: Option<String>,
    #[serde(default)]
    pub calendarEventId: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Appointment {
    pub fn calendar_event_label(&self) -> String {
        match &self.calendarEventId {
            None | Some(Value::Null) => "None".to_string(),
            Some(Value::String(id)) => id.to_owned(),
            Some(other) => other.to_string(),
        }
    }
}
