use crate::error::{RegistrationError, RegistrationResult};
use crate::models::{
    FoodPreference, MalformedFields, RegistrationReceipt, RegistrationRequest, Screenshot,
};
use crate::AppState;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use std::collections::HashMap;
use tracing::{debug, warn};

const DEFAULT_SCREENSHOT_NAME: &str = "screenshot";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const UPLOAD_TOO_LARGE: &str = "Screenshot is too large";

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> RegistrationResult<Json<RegistrationReceipt>> {
    let request = read_registration(multipart).await?;
    let receipt = state.service.submit(request).await?;
    Ok(Json(receipt))
}

/// Decode the multipart form. Missing text fields become empty strings and
/// undecodable JSON or enum values are recorded in `malformed`; both are
/// reported by validation. Only a structurally broken body fails here.
async fn read_registration(mut multipart: Multipart) -> RegistrationResult<RegistrationRequest> {
    let mut text: HashMap<String, String> = HashMap::new();
    let mut screenshot = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error("Malformed form data", e))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "screenshot" {
            let filename = field
                .file_name()
                .filter(|f| !f.is_empty())
                .unwrap_or(DEFAULT_SCREENSHOT_NAME)
                .to_string();
            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| form_error("Failed to read screenshot", e))?;

            debug!(filename = %filename, size = bytes.len(), "Received payment screenshot");
            screenshot = Some(Screenshot {
                bytes: bytes.to_vec(),
                filename,
                content_type,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| form_error(&format!("Invalid value for {}", name), e))?;
            text.insert(name, value);
        }
    }

    let mut take = |key: &str| text.remove(key).unwrap_or_default();

    let name = take("name");
    let email = take("email");
    let mobile = take("mobile");
    let college = take("college");
    let year = take("year");
    let transaction_id = take("transactionId");
    let mut malformed = MalformedFields::default();
    let selected_event_ids = parse_selected_events(&take("selectedEventIds"))
        .unwrap_or_else(|e| {
            malformed.selected_event_ids = Some(e);
            Vec::new()
        });
    let fallback_selections = parse_fallbacks(&take("fallbackSelections")).unwrap_or_else(|e| {
        malformed.fallback_selections = Some(e);
        HashMap::new()
    });
    let food_preference = parse_food_preference(&take("foodPreference")).unwrap_or_else(|e| {
        malformed.food_preference = Some(e);
        FoodPreference::default()
    });
    let pass_id = Some(take("passId")).filter(|id| !id.trim().is_empty());

    Ok(RegistrationRequest {
        name,
        email,
        mobile,
        college,
        year,
        selected_event_ids,
        fallback_selections,
        transaction_id,
        food_preference,
        pass_id,
        screenshot,
        malformed,
    })
}

/// The body limit is hit while streaming, usually inside the screenshot
fn form_error(context: &str, err: MultipartError) -> RegistrationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Registration form over the upload limit: {}", err);
        return RegistrationError::validation(UPLOAD_TOO_LARGE);
    }
    warn!("{}: {}", context, err);
    RegistrationError::validation(format!("{}: {}", context, err.body_text()))
}

fn parse_selected_events(raw: &str) -> Result<Vec<String>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|_| "selectedEventIds must be a JSON array of event ids".to_string())
}

/// `null` or empty values are dropped so validation reports them as missing
fn parse_fallbacks(raw: &str) -> Result<HashMap<String, String>, String> {
    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let parsed: HashMap<String, Option<String>> = serde_json::from_str(raw)
        .map_err(|_| "fallbackSelections must be a JSON object of event ids".to_string())?;

    Ok(parsed
        .into_iter()
        .filter_map(|(event, fallback)| fallback.map(|f| (event, f)))
        .collect())
}

fn parse_food_preference(raw: &str) -> Result<FoodPreference, String> {
    if raw.trim().is_empty() {
        return Ok(FoodPreference::default());
    }
    FoodPreference::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selected_events() {
        assert_eq!(
            parse_selected_events(r#"["icon-iq","code-sprint"]"#).unwrap(),
            vec!["icon-iq".to_string(), "code-sprint".to_string()]
        );
        assert!(parse_selected_events("").unwrap().is_empty());
        assert_eq!(
            parse_selected_events("icon-iq").unwrap_err(),
            "selectedEventIds must be a JSON array of event ids"
        );
    }

    #[test]
    fn test_parse_fallbacks_drops_nulls() {
        let parsed =
            parse_fallbacks(r#"{"paper-presentation":"icon-iq","project-expo":null}"#).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["paper-presentation"], "icon-iq");

        assert!(parse_fallbacks("").unwrap().is_empty());
        assert!(parse_fallbacks("[1]").is_err());
    }

    #[test]
    fn test_parse_food_preference() {
        assert_eq!(parse_food_preference("").unwrap(), FoodPreference::Veg);
        assert_eq!(parse_food_preference("non_veg").unwrap(), FoodPreference::NonVeg);
        assert_eq!(
            parse_food_preference("vegan").unwrap_err(),
            "Invalid food preference: vegan"
        );
    }
}
