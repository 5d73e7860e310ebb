use super::store::{RegistrationStore, RegistrationTx};
use super::{EventRegistrationRepository, ParticipantRepository, PaymentRepository};
use crate::error::StoreError;
use crate::models::{EventRegistration, Participant, Payment};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

/// Postgres-backed [`RegistrationStore`].
///
/// Runs at the default READ COMMITTED level. The pre-check in
/// `find_participant_by_email_or_mobile` is advisory; the unique indexes on
/// `participants` serialize concurrent inserts of the same email or mobile,
/// and the loser fails with `23505` once the winner commits.
#[derive(Clone)]
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    async fn begin(&self) -> Result<Box<dyn RegistrationTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgRegistrationTx { tx }))
    }
}

/// Wraps a sqlx transaction, which rolls back when dropped uncommitted
pub struct PgRegistrationTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RegistrationTx for PgRegistrationTx {
    async fn find_participant_by_email_or_mobile(
        &mut self,
        email: &str,
        mobile: &str,
    ) -> Result<Option<Participant>, StoreError> {
        Ok(ParticipantRepository::find_by_email_or_mobile_in(&mut *self.tx, email, mobile).await?)
    }

    async fn insert_participant(&mut self, participant: &Participant) -> Result<(), StoreError> {
        Ok(ParticipantRepository::insert(&mut *self.tx, participant).await?)
    }

    async fn insert_event_registrations(
        &mut self,
        registrations: &[EventRegistration],
    ) -> Result<(), StoreError> {
        Ok(EventRegistrationRepository::insert_batch(&mut *self.tx, registrations).await?)
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        Ok(PaymentRepository::insert(&mut *self.tx, payment).await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        Ok(self.tx.commit().await?)
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(self.tx.rollback().await?)
    }
}
