use super::FoodPreference;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Uploaded payment proof
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Form values that arrived but could not be decoded, with the message to
/// report. Validation raises them at the point where the field is checked.
#[derive(Debug, Clone, Default)]
pub struct MalformedFields {
    pub selected_event_ids: Option<String>,
    pub fallback_selections: Option<String>,
    pub food_preference: Option<String>,
}

/// A registration submission as decoded from the multipart form
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub year: String,
    pub selected_event_ids: Vec<String>,
    /// Abstract event id -> fallback event id
    pub fallback_selections: HashMap<String, String>,
    pub transaction_id: String,
    pub food_preference: FoodPreference,
    /// Falls back to the catalog's default pass
    pub pass_id: Option<String>,
    pub screenshot: Option<Screenshot>,
    pub malformed: MalformedFields,
}

/// What the client gets back after a committed registration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub success: bool,
    pub unique_code: String,
    pub events: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub has_submission_events: bool,
}
