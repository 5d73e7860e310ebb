use crate::models::Payment;
use sqlx::{PgConnection, PgPool, Result as SqlxResult};
use uuid::Uuid;

/// Repository for payment rows
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(conn: &mut PgConnection, payment: &Payment) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, participant_id, amount, screenshot_url, transaction_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(payment.id)
        .bind(payment.participant_id)
        .bind(payment.amount)
        .bind(&payment.screenshot_url)
        .bind(&payment.transaction_id)
        .bind(payment.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn find_by_participant(&self, participant_id: Uuid) -> SqlxResult<Option<Payment>> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, participant_id, amount, screenshot_url, transaction_id, created_at
            FROM payments
            WHERE participant_id = $1
            "#,
        )
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await
    }
}
