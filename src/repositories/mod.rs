pub mod event_registration_repository;
pub mod memory;
pub mod participant_repository;
pub mod payment_repository;
pub mod postgres;
pub mod store;

// Re-export all repositories for convenient access
pub use event_registration_repository::EventRegistrationRepository;
pub use memory::{FailPoint, MemoryRegistrationStore};
pub use participant_repository::ParticipantRepository;
pub use payment_repository::PaymentRepository;
pub use postgres::PgRegistrationStore;
pub use store::{RegistrationStore, RegistrationTx};
