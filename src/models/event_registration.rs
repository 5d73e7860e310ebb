use crate::catalog::{Event, TimeSlot};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registration status; this service only writes `Confirmed`,
/// later states are set by organizer tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Confirmed,
    Shortlisted,
    MovedToFallback,
    Cancelled,
}

impl RegistrationStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "CONFIRMED" => Ok(RegistrationStatus::Confirmed),
            "SHORTLISTED" => Ok(RegistrationStatus::Shortlisted),
            "MOVED_TO_FALLBACK" => Ok(RegistrationStatus::MovedToFallback),
            "CANCELLED" => Ok(RegistrationStatus::Cancelled),
            _ => Err(format!("Invalid registration status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "CONFIRMED",
            RegistrationStatus::Shortlisted => "SHORTLISTED",
            RegistrationStatus::MovedToFallback => "MOVED_TO_FALLBACK",
            RegistrationStatus::Cancelled => "CANCELLED",
        }
    }
}

/// On-site attendance tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    NotRequired,
    Pending,
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Online events need no check-in
    pub fn for_time_slot(slot: TimeSlot) -> Self {
        if slot.is_online() {
            AttendanceStatus::NotRequired
        } else {
            AttendanceStatus::Pending
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "NOT_REQUIRED" => Ok(AttendanceStatus::NotRequired),
            "PENDING" => Ok(AttendanceStatus::Pending),
            "PRESENT" => Ok(AttendanceStatus::Present),
            "ABSENT" => Ok(AttendanceStatus::Absent),
            _ => Err(format!("Invalid attendance status: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::NotRequired => "NOT_REQUIRED",
            AttendanceStatus::Pending => "PENDING",
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
        }
    }
}

/// Links a participant to one selected event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRegistration {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub event_id: String,
    pub fallback_event_id: Option<String>, // Only for ABSTRACT events
    pub status: String,
    pub attendance_status: String,
    pub created_at: NaiveDateTime,
}

impl EventRegistration {
    /// New confirmed registration; attendance is seeded from the event's slot
    pub fn confirmed(participant_id: Uuid, event: &Event, fallback_event_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant_id,
            event_id: event.id.clone(),
            fallback_event_id: if event.is_abstract() { fallback_event_id } else { None },
            status: RegistrationStatus::Confirmed.as_str().to_string(),
            attendance_status: AttendanceStatus::for_time_slot(event.time_slot)
                .as_str()
                .to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn status_enum(&self) -> RegistrationStatus {
        RegistrationStatus::from_str(&self.status).unwrap_or(RegistrationStatus::Confirmed)
    }

    pub fn attendance_enum(&self) -> AttendanceStatus {
        AttendanceStatus::from_str(&self.attendance_status).unwrap_or(AttendanceStatus::Pending)
    }
}
