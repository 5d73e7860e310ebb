use crate::catalog::{Catalog, Event, Pass};
use crate::error::{DependencyError, RegistrationError, RegistrationResult};
use crate::models::{
    EventRegistration, FoodPreference, Participant, Payment, RegistrationReceipt,
    RegistrationRequest, Screenshot,
};
use crate::notifications::{ConfirmationEmail, EmailEvent, NotificationDispatcher};
use crate::repositories::{RegistrationStore, RegistrationTx};
use crate::storage::{BlobStore, PAYMENTS_CATEGORY};
use crate::validation::{
    validate_contact_format, validate_payment_fields, validate_personal_fields,
    SelectionValidator,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A submission that passed every check and is ready to be written
#[derive(Debug, Clone)]
struct RegistrationPlan {
    name: String,
    email: String,
    mobile: String,
    college: String,
    year: String,
    food_preference: FoodPreference,
    transaction_id: String,
    screenshot: Screenshot,
    pass: Pass,
    /// In submission order
    events: Vec<Event>,
    /// Abstract event id -> fallback event id
    fallbacks: HashMap<String, String>,
}

/// Registers a participant for a set of events in one atomic step.
///
/// Validation runs up front and never touches a dependency. Persistence
/// (uniqueness check, screenshot upload, participant/registration/payment
/// rows) happens inside one store transaction on its own task, bounded by
/// `timeout`, so a dropped request cannot abandon it halfway. The
/// confirmation email is only scheduled after commit.
#[derive(Clone)]
pub struct RegistrationService {
    catalog: Arc<Catalog>,
    store: Arc<dyn RegistrationStore>,
    blobs: Arc<dyn BlobStore>,
    dispatcher: NotificationDispatcher,
    timeout: Duration,
}

impl RegistrationService {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn RegistrationStore>,
        blobs: Arc<dyn BlobStore>,
        dispatcher: NotificationDispatcher,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            store,
            blobs,
            dispatcher,
            timeout,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Validate and persist a registration
    pub async fn submit(&self, request: RegistrationRequest) -> RegistrationResult<RegistrationReceipt> {
        let plan = self.prepare(request)?;

        debug!(
            email = %plan.email,
            pass = %plan.pass.id,
            events = plan.events.len(),
            "Registration passed validation"
        );

        let service = self.clone();
        tokio::spawn(async move { service.persist_and_confirm(plan).await })
            .await
            .map_err(|e| DependencyError::Task(e.to_string()))?
    }

    fn prepare(&self, request: RegistrationRequest) -> RegistrationResult<RegistrationPlan> {
        validate_personal_fields(&request)?;
        validate_payment_fields(&request)?;
        validate_contact_format(&request)?;

        if let Some(message) = &request.malformed.food_preference {
            return Err(RegistrationError::validation(message.clone()));
        }

        let pass = match request.pass_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => self
                .catalog
                .lookup_pass(id)
                .ok_or_else(|| RegistrationError::validation("Invalid pass"))?,
            _ => self.catalog.default_pass(),
        };

        if let Some(message) = &request.malformed.selected_event_ids {
            return Err(RegistrationError::validation(message.clone()));
        }
        if request.selected_event_ids.is_empty() {
            return Err(RegistrationError::validation("Select at least one event"));
        }

        let mut seen = HashSet::new();
        for id in &request.selected_event_ids {
            if !seen.insert(id.as_str()) {
                return Err(RegistrationError::validation(format!(
                    "Duplicate event selection: {}",
                    id
                )));
            }
        }

        let selection = self
            .catalog
            .resolve_events(&request.selected_event_ids)
            .map_err(|unknown| {
                RegistrationError::validation(format!("Invalid event id(s): {}", unknown.join(", ")))
            })?;

        SelectionValidator::validate_selection(&selection, pass)
            .map_err(|rejection| RegistrationError::validation(rejection.to_string()))?;

        if let Some(message) = &request.malformed.fallback_selections {
            return Err(RegistrationError::validation(message.clone()));
        }
        let fallbacks = SelectionValidator::validate_fallbacks(
            &selection,
            &request.fallback_selections,
            &self.catalog,
        )
        .map_err(|e| RegistrationError::validation(e.to_string()))?;

        let screenshot = request
            .screenshot
            .ok_or_else(|| RegistrationError::validation("Payment screenshot is required"))?;

        Ok(RegistrationPlan {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            mobile: request.mobile.trim().to_string(),
            college: request.college.trim().to_string(),
            year: request.year.trim().to_string(),
            food_preference: request.food_preference,
            transaction_id: request.transaction_id.trim().to_string(),
            screenshot,
            pass: pass.clone(),
            events: selection.into_iter().cloned().collect(),
            fallbacks,
        })
    }

    async fn persist_and_confirm(&self, plan: RegistrationPlan) -> RegistrationResult<RegistrationReceipt> {
        let participant = match tokio::time::timeout(self.timeout, self.persist(&plan)).await {
            Ok(result) => result?,
            Err(_) => {
                // The transaction future was dropped, which rolled it back
                warn!(email = %plan.email, timeout = ?self.timeout, "Registration timed out");
                return Err(DependencyError::Timeout(self.timeout).into());
            }
        };

        info!(
            participant_id = %participant.id,
            unique_code = %participant.unique_code,
            events = plan.events.len(),
            "Registration committed"
        );

        self.dispatcher.dispatch(ConfirmationEmail {
            to: participant.email.clone(),
            name: participant.name.clone(),
            unique_code: participant.unique_code.clone(),
            events: plan.events.iter().map(EmailEvent::from).collect(),
            amount: plan.pass.price,
        });

        Ok(RegistrationReceipt {
            success: true,
            unique_code: participant.unique_code,
            events: plan.events.iter().map(|e| e.title.clone()).collect(),
            amount: plan.pass.price,
            has_submission_events: plan.events.iter().any(Event::requires_submission),
        })
    }

    async fn persist(&self, plan: &RegistrationPlan) -> RegistrationResult<Participant> {
        let mut tx = self.store.begin().await?;

        match self.write(tx.as_mut(), plan).await {
            Ok(participant) => {
                tx.commit().await?;
                Ok(participant)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn write(
        &self,
        tx: &mut dyn RegistrationTx,
        plan: &RegistrationPlan,
    ) -> RegistrationResult<Participant> {
        if let Some(existing) = tx
            .find_participant_by_email_or_mobile(&plan.email, &plan.mobile)
            .await?
        {
            info!(participant_id = %existing.id, "Participant already registered");
            return Err(RegistrationError::already_registered());
        }

        let participant = Participant::new(
            plan.name.clone(),
            plan.email.clone(),
            plan.mobile.clone(),
            plan.college.clone(),
            plan.year.clone(),
            plan.food_preference,
        );

        // Not reversed if the transaction later rolls back
        let screenshot_url = self
            .blobs
            .store(
                &plan.screenshot.bytes,
                &plan.screenshot.filename,
                &plan.screenshot.content_type,
                PAYMENTS_CATEGORY,
                participant.id,
            )
            .await?;

        tx.insert_participant(&participant).await?;

        let registrations: Vec<EventRegistration> = plan
            .events
            .iter()
            .map(|event| {
                EventRegistration::confirmed(participant.id, event, plan.fallbacks.get(&event.id).cloned())
            })
            .collect();
        tx.insert_event_registrations(&registrations).await?;

        let payment = Payment::new(
            participant.id,
            plan.pass.price,
            screenshot_url,
            plan.transaction_id.clone(),
        );
        tx.insert_payment(&payment).await?;

        Ok(participant)
    }
}
