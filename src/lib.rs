//! Gusto Registration Library
//!
//! Event registration backend for the Gusto symposium: catalog and selection
//! rules, the atomic registration transaction, blob storage for payment
//! proofs, confirmation emails and the HTTP surface.

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod notifications;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult, RegistrationError, RegistrationResult};

use catalog::Catalog;
use database::Database;
use services::RegistrationService;
use std::sync::Arc;

/// Shared state handed to every HTTP handler
#[derive(Clone)]
pub struct AppState {
    pub service: RegistrationService,
    pub catalog: Arc<Catalog>,
    /// Absent when running against the in-memory store
    pub database: Option<Database>,
}

impl AppState {
    pub fn new(service: RegistrationService, database: Option<Database>) -> Self {
        Self {
            catalog: service.catalog().clone(),
            service,
            database,
        }
    }
}
