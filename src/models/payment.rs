use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Payment proof for a registration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub amount: Decimal,
    pub screenshot_url: String,
    pub transaction_id: String, // UTR / UPI reference
    pub created_at: NaiveDateTime,
}

impl Payment {
    pub fn new(participant_id: Uuid, amount: Decimal, screenshot_url: String, transaction_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_id,
            amount,
            screenshot_url,
            transaction_id,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
