use serde::{Deserialize, Serialize};

/// Event category, counted separately against a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Technical")]
    Technical,
    #[serde(rename = "Non-Technical")]
    NonTechnical,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::NonTechnical => "Non-Technical",
        }
    }
}

/// How a participant gets into an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdmissionMode {
    /// Register freely
    Direct,
    /// Abstract is reviewed; a fallback event is required
    Abstract,
    /// Asynchronous entry (photo, video), no physical attendance
    Submission,
}

impl AdmissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionMode::Direct => "DIRECT",
            AdmissionMode::Abstract => "ABSTRACT",
            AdmissionMode::Submission => "SUBMISSION",
        }
    }
}

/// Physical track (hall) an event runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeSlot {
    #[serde(rename = "SLOT_1015")]
    Slot1015,
    #[serde(rename = "SLOT_1100")]
    Slot1100,
    /// Never conflicts with anything
    Online,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Slot1015 => "SLOT_1015",
            TimeSlot::Slot1100 => "SLOT_1100",
            TimeSlot::Online => "ONLINE",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, TimeSlot::Online)
    }
}

/// Immutable catalog entry for a symposium event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub admission_mode: AdmissionMode,
    pub track: Track,
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_email: Option<String>,
}

impl Event {
    pub fn is_abstract(&self) -> bool {
        self.admission_mode == AdmissionMode::Abstract
    }

    pub fn is_technical(&self) -> bool {
        self.category == Category::Technical
    }

    /// Abstract and submission events need follow-up after registering
    pub fn requires_submission(&self) -> bool {
        matches!(
            self.admission_mode,
            AdmissionMode::Abstract | AdmissionMode::Submission
        )
    }

    /// Same track at the same non-online slot
    pub fn conflicts_with(&self, other: &Event) -> bool {
        if self.time_slot.is_online() || other.time_slot.is_online() {
            return false;
        }
        self.track == other.track && self.time_slot == other.time_slot
    }
}
