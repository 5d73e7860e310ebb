//! In-process [`RegistrationStore`] for tests and local runs without Postgres.
//!
//! Transactions stage their writes and apply them under one lock at commit,
//! re-checking the same unique and foreign-key constraints the SQL schema
//! declares. Failures can be injected per operation.

use super::store::{RegistrationStore, RegistrationTx};
use crate::error::StoreError;
use crate::models::{EventRegistration, Participant, Payment};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Begin,
    FindParticipant,
    InsertParticipant,
    InsertRegistrations,
    InsertPayment,
    Commit,
}

#[derive(Debug, Default)]
struct Tables {
    participants: Vec<Participant>,
    registrations: Vec<EventRegistration>,
    payments: Vec<Payment>,
}

#[derive(Debug, Default)]
struct Shared {
    tables: Mutex<Tables>,
    failures: Mutex<HashMap<FailPoint, StoreError>>,
}

#[derive(Clone, Default)]
pub struct MemoryRegistrationStore {
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test must not wedge every other test sharing the store
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: Some(constraint.to_string()),
        message: format!("duplicate key value violates unique constraint \"{}\"", constraint),
    }
}

impl MemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call at `point` fail with `error`
    pub fn fail_at(&self, point: FailPoint, error: StoreError) {
        lock(&self.shared.failures).insert(point, error);
    }

    pub fn clear_failures(&self) {
        lock(&self.shared.failures).clear();
    }

    pub fn participants(&self) -> Vec<Participant> {
        lock(&self.shared.tables).participants.clone()
    }

    pub fn registrations(&self) -> Vec<EventRegistration> {
        lock(&self.shared.tables).registrations.clone()
    }

    pub fn payments(&self) -> Vec<Payment> {
        lock(&self.shared.tables).payments.clone()
    }

    fn check(&self, point: FailPoint) -> Result<(), StoreError> {
        match lock(&self.shared.failures).get(&point) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn begin(&self) -> Result<Box<dyn RegistrationTx>, StoreError> {
        self.check(FailPoint::Begin)?;
        Ok(Box::new(MemoryRegistrationTx {
            store: self.clone(),
            staged: Tables::default(),
        }))
    }
}

pub struct MemoryRegistrationTx {
    store: MemoryRegistrationStore,
    staged: Tables,
}

fn identity_clash(existing: &Participant, candidate: &Participant) -> Option<&'static str> {
    if existing.email == candidate.email {
        Some("participants_email_key")
    } else if existing.mobile == candidate.mobile {
        Some("participants_mobile_key")
    } else if existing.unique_code == candidate.unique_code {
        Some("participants_unique_code_key")
    } else {
        None
    }
}

impl MemoryRegistrationTx {
    fn participant_visible(&self, tables: &Tables, participant_id: uuid::Uuid) -> bool {
        tables
            .participants
            .iter()
            .chain(self.staged.participants.iter())
            .any(|p| p.id == participant_id)
    }
}

#[async_trait]
impl RegistrationTx for MemoryRegistrationTx {
    async fn find_participant_by_email_or_mobile(
        &mut self,
        email: &str,
        mobile: &str,
    ) -> Result<Option<Participant>, StoreError> {
        self.store.check(FailPoint::FindParticipant)?;
        let tables = lock(&self.store.shared.tables);
        Ok(tables
            .participants
            .iter()
            .chain(self.staged.participants.iter())
            .find(|p| p.email == email || p.mobile == mobile)
            .cloned())
    }

    async fn insert_participant(&mut self, participant: &Participant) -> Result<(), StoreError> {
        self.store.check(FailPoint::InsertParticipant)?;
        let tables = lock(&self.store.shared.tables);
        for existing in tables.participants.iter().chain(self.staged.participants.iter()) {
            if let Some(constraint) = identity_clash(existing, participant) {
                return Err(unique_violation(constraint));
            }
        }
        drop(tables);
        self.staged.participants.push(participant.clone());
        Ok(())
    }

    async fn insert_event_registrations(
        &mut self,
        registrations: &[EventRegistration],
    ) -> Result<(), StoreError> {
        self.store.check(FailPoint::InsertRegistrations)?;
        let tables = lock(&self.store.shared.tables);
        for registration in registrations {
            if !self.participant_visible(&tables, registration.participant_id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "participant {} does not exist",
                    registration.participant_id
                )));
            }
        }
        drop(tables);
        self.staged.registrations.extend_from_slice(registrations);
        Ok(())
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        self.store.check(FailPoint::InsertPayment)?;
        let tables = lock(&self.store.shared.tables);
        if !self.participant_visible(&tables, payment.participant_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "participant {} does not exist",
                payment.participant_id
            )));
        }
        drop(tables);
        self.staged.payments.push(payment.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.store.check(FailPoint::Commit)?;
        let MemoryRegistrationTx { store, staged } = *self;
        let mut tables = lock(&store.shared.tables);

        // Another transaction may have committed the same identity meanwhile
        for candidate in &staged.participants {
            if let Some(constraint) = tables
                .participants
                .iter()
                .find_map(|existing| identity_clash(existing, candidate))
            {
                return Err(unique_violation(constraint));
            }
        }

        tables.participants.extend(staged.participants);
        tables.registrations.extend(staged.registrations);
        tables.payments.extend(staged.payments);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}
