//! Transactional seam between the registration service and the relational store.

use crate::error::StoreError;
use crate::models::{EventRegistration, Participant, Payment};
use async_trait::async_trait;

/// Opens registration transactions
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn RegistrationTx>, StoreError>;
}

/// A single open transaction.
///
/// Writes become visible to other transactions only after [`commit`]. Dropping
/// the handle without committing rolls everything back, so every exit path
/// (early return, `?`, panic, cancelled future) releases it cleanly.
///
/// [`commit`]: RegistrationTx::commit
#[async_trait]
pub trait RegistrationTx: Send {
    async fn find_participant_by_email_or_mobile(
        &mut self,
        email: &str,
        mobile: &str,
    ) -> Result<Option<Participant>, StoreError>;

    /// Must fail with [`StoreError::UniqueViolation`] if email, mobile or
    /// unique code is already taken by a committed participant
    async fn insert_participant(&mut self, participant: &Participant) -> Result<(), StoreError>;

    /// One statement for all rows
    async fn insert_event_registrations(
        &mut self,
        registrations: &[EventRegistration],
    ) -> Result<(), StoreError>;

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
