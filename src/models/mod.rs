//! Domain models for the registration backend.
//!
//! Database-backed entities (participant, event registrations, payment) and
//! the transient submission/receipt types that flow through the service.

pub mod event_registration;
pub mod participant;
pub mod payment;
pub mod submission;

// Re-export all models for convenient access
pub use event_registration::{AttendanceStatus, EventRegistration, RegistrationStatus};
pub use participant::{generate_unique_code, is_unique_code, FoodPreference, Participant};
pub use payment::Payment;
pub use submission::{MalformedFields, RegistrationReceipt, RegistrationRequest, Screenshot};
