use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purchasable tier limiting how many events of each category may be picked.
///
/// `max_technical + max_non_technical` may be more or less than `max_total`;
/// all three limits are checked independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub max_total: u32,
    pub max_technical: u32,
    pub max_non_technical: u32,
}
