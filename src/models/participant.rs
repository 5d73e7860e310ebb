use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Meal choice collected at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodPreference {
    #[default]
    Veg,
    NonVeg,
}

impl FoodPreference {
    /// Convert from form/database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "VEG" => Ok(FoodPreference::Veg),
            "NON_VEG" | "NONVEG" => Ok(FoodPreference::NonVeg),
            _ => Err(format!("Invalid food preference: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodPreference::Veg => "VEG",
            FoodPreference::NonVeg => "NON_VEG",
        }
    }
}

/// Characters used in unique codes; no 0/O or 1/I to keep codes readable aloud
const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const CODE_PREFIX: &str = "GUSTO-";
pub const CODE_LENGTH: usize = 6;

/// Random, non-sequential human-facing code such as `GUSTO-7KQ2MX`.
///
/// Drawn from a fresh v4 UUID's random bytes, independent of the participant id.
pub fn generate_unique_code() -> String {
    let entropy = Uuid::new_v4();
    let suffix: String = entropy
        .as_bytes()
        .iter()
        .take(CODE_LENGTH)
        // 256 is a multiple of 32, so the modulo is unbiased
        .map(|b| CODE_ALPHABET[(*b as usize) % CODE_ALPHABET.len()] as char)
        .collect();
    format!("{}{}", CODE_PREFIX, suffix)
}

pub fn is_unique_code(code: &str) -> bool {
    match code.strip_prefix(CODE_PREFIX) {
        Some(suffix) => {
            suffix.len() == CODE_LENGTH && suffix.bytes().all(|b| CODE_ALPHABET.contains(&b))
        }
        None => false,
    }
}

/// A registered participant (the aggregate root of a registration)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub college: String,
    pub year: String,
    pub unique_code: String,
    pub food_preference: String, // Stored as TEXT, use FoodPreference enum for type safety
    pub created_at: NaiveDateTime,
}

impl Participant {
    /// Create a new participant with fresh identifiers
    pub fn new(
        name: String,
        email: String,
        mobile: String,
        college: String,
        year: String,
        food_preference: FoodPreference,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            mobile,
            college,
            year,
            unique_code: generate_unique_code(),
            food_preference: food_preference.as_str().to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn food_preference_enum(&self) -> FoodPreference {
        FoodPreference::from_str(&self.food_preference).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_food_preference_parsing() {
        assert_eq!(FoodPreference::from_str("veg"), Ok(FoodPreference::Veg));
        assert_eq!(FoodPreference::from_str("NON_VEG"), Ok(FoodPreference::NonVeg));
        assert_eq!(FoodPreference::from_str("non-veg"), Ok(FoodPreference::NonVeg));
        assert!(FoodPreference::from_str("vegan").is_err());
        assert_eq!(FoodPreference::default(), FoodPreference::Veg);
    }

    #[test]
    fn test_unique_code_format() {
        let code = generate_unique_code();
        assert!(code.starts_with("GUSTO-"));
        assert_eq!(code.len(), CODE_PREFIX.len() + CODE_LENGTH);
        assert!(is_unique_code(&code), "{}", code);
        assert!(!is_unique_code("GUSTO-0000O1"));
        assert!(!is_unique_code("7KQ2MX"));
    }

    #[test]
    fn test_unique_codes_are_not_sequential() {
        let codes: HashSet<String> = (0..500).map(|_| generate_unique_code()).collect();
        // 32^6 possibilities; 500 draws colliding would point at a broken generator
        assert!(codes.len() >= 499);
    }

    #[test]
    fn test_participant_ids_are_distinct_namespaces() {
        let p = Participant::new(
            "A".into(),
            "a@x.com".into(),
            "9000000001".into(),
            "C".into(),
            "2nd Year".into(),
            FoodPreference::NonVeg,
        );
        assert!(!p.id.is_nil());
        assert!(!p.unique_code.contains(&p.id.to_string()));
        assert_eq!(p.food_preference_enum(), FoodPreference::NonVeg);
    }
}
