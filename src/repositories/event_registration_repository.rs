use crate::models::EventRegistration;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

/// Repository for event registration rows
pub struct EventRegistrationRepository {
    pool: PgPool,
}

impl EventRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert all rows with a single multi-row statement
    pub async fn insert_batch(
        conn: &mut PgConnection,
        registrations: &[EventRegistration],
    ) -> SqlxResult<()> {
        if registrations.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO event_registrations \
             (id, participant_id, event_id, fallback_event_id, status, attendance_status, created_at) ",
        );

        builder.push_values(registrations, |mut row, registration| {
            row.push_bind(registration.id)
                .push_bind(registration.participant_id)
                .push_bind(registration.event_id.clone())
                .push_bind(registration.fallback_event_id.clone())
                .push_bind(registration.status.clone())
                .push_bind(registration.attendance_status.clone())
                .push_bind(registration.created_at);
        });

        builder.build().execute(conn).await?;
        Ok(())
    }

    /// All registrations for a participant
    pub async fn find_by_participant(&self, participant_id: Uuid) -> SqlxResult<Vec<EventRegistration>> {
        sqlx::query_as::<_, EventRegistration>(
            r#"
            SELECT id, participant_id, event_id, fallback_event_id, status, attendance_status, created_at
            FROM event_registrations
            WHERE participant_id = $1
            ORDER BY event_id
            "#,
        )
        .bind(participant_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Number of participants registered for an event
    pub async fn count_for_event(&self, event_id: &str) -> SqlxResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
    }
}
