//! Input validation: request fields and event-selection admission rules.

pub mod request;
pub mod selection;

pub use request::{
    is_valid_email, is_valid_mobile, validate_contact_format, validate_payment_fields,
    validate_personal_fields,
};
pub use selection::{Admission, FallbackError, Rejection, SelectionCounts, SelectionValidator};
