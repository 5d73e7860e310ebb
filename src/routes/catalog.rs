use crate::catalog::{Catalog, Event, Pass};
use crate::error::{RegistrationError, RegistrationResult};
use crate::validation::{Admission, SelectionCounts, SelectionValidator};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

/// `GET /api/events`
pub async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.catalog.list_events().to_vec())
}

/// `GET /api/passes`
pub async fn list_passes(State(state): State<AppState>) -> Json<Vec<Pass>> {
    Json(state.catalog.list_passes().to_vec())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCheckRequest {
    #[serde(default)]
    pub pass_id: Option<String>,
    #[serde(default)]
    pub selected_event_ids: Vec<String>,
    pub candidate_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCheckResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Counts for the selection as it would be after this check
    pub counts: SelectionCounts,
}

/// `POST /api/selection/check`
pub async fn check_selection(
    State(state): State<AppState>,
    Json(body): Json<SelectionCheckRequest>,
) -> RegistrationResult<Json<SelectionCheckResponse>> {
    let catalog = &state.catalog;
    let pass = resolve_pass(catalog, body.pass_id.as_deref())?;
    let mut selection = resolve(catalog, &body.selected_event_ids)?;
    let candidate = catalog
        .lookup_event(&body.candidate_id)
        .ok_or_else(|| RegistrationError::validation(format!("Invalid event id(s): {}", body.candidate_id)))?;

    let response = match SelectionValidator::can_add(&selection, pass, candidate) {
        Ok(admission) => {
            if admission == Admission::Admissible {
                selection.push(candidate);
            }
            SelectionCheckResponse {
                ok: true,
                reason: None,
                counts: SelectionValidator::count_selection(&selection, pass),
            }
        }
        Err(rejection) => SelectionCheckResponse {
            ok: false,
            reason: Some(rejection.to_string()),
            counts: SelectionValidator::count_selection(&selection, pass),
        },
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackRequest {
    #[serde(default)]
    pub selected_event_ids: Vec<String>,
    pub abstract_event_id: String,
}

#[derive(Debug, Serialize)]
pub struct FallbackResponse {
    pub fallbacks: Vec<Event>,
}

/// `POST /api/selection/fallbacks`
pub async fn list_fallbacks(
    State(state): State<AppState>,
    Json(body): Json<FallbackRequest>,
) -> RegistrationResult<Json<FallbackResponse>> {
    let catalog = &state.catalog;
    let selection = resolve(catalog, &body.selected_event_ids)?;
    let abstract_event = catalog
        .lookup_event(&body.abstract_event_id)
        .filter(|e| e.is_abstract())
        .ok_or_else(|| {
            RegistrationError::validation(format!("Not an abstract event: {}", body.abstract_event_id))
        })?;

    let fallbacks = SelectionValidator::fallbacks_for(&selection, abstract_event, catalog.list_events())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(FallbackResponse { fallbacks }))
}

fn resolve<'a>(catalog: &'a Catalog, ids: &[String]) -> RegistrationResult<Vec<&'a Event>> {
    catalog.resolve_events(ids).map_err(|unknown| {
        RegistrationError::validation(format!("Invalid event id(s): {}", unknown.join(", ")))
    })
}

fn resolve_pass<'a>(catalog: &'a Catalog, pass_id: Option<&str>) -> RegistrationResult<&'a Pass> {
    match pass_id {
        Some(id) => catalog
            .lookup_pass(id)
            .ok_or_else(|| RegistrationError::validation("Invalid pass")),
        None => Ok(catalog.default_pass()),
    }
}
