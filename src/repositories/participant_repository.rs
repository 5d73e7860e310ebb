use crate::models::Participant;
use sqlx::{PgConnection, PgPool, Result as SqlxResult};

const PARTICIPANT_COLUMNS: &str =
    "id, name, email, mobile, college, year, unique_code, food_preference, created_at";

/// Repository for participant data access
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a participant inside an open transaction
    pub async fn insert(conn: &mut PgConnection, participant: &Participant) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO participants
                (id, name, email, mobile, college, year, unique_code, food_preference, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(participant.id)
        .bind(&participant.name)
        .bind(&participant.email)
        .bind(&participant.mobile)
        .bind(&participant.college)
        .bind(&participant.year)
        .bind(&participant.unique_code)
        .bind(&participant.food_preference)
        .bind(participant.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Look for anyone already holding this email or mobile
    pub async fn find_by_email_or_mobile_in(
        conn: &mut PgConnection,
        email: &str,
        mobile: &str,
    ) -> SqlxResult<Option<Participant>> {
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {} FROM participants WHERE email = $1 OR mobile = $2 LIMIT 1",
            PARTICIPANT_COLUMNS
        ))
        .bind(email)
        .bind(mobile)
        .fetch_optional(conn)
        .await
    }

    /// Find a participant by their human-facing code
    pub async fn find_by_unique_code(&self, unique_code: &str) -> SqlxResult<Option<Participant>> {
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {} FROM participants WHERE unique_code = $1",
            PARTICIPANT_COLUMNS
        ))
        .bind(unique_code)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> SqlxResult<Option<Participant>> {
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {} FROM participants WHERE email = $1",
            PARTICIPANT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn count(&self) -> SqlxResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM participants")
            .fetch_one(&self.pool)
            .await
    }
}
