use crate::error::{RegistrationError, RegistrationResult};
use crate::models::RegistrationRequest;

/// Basic `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && !tld.is_empty() && !host.starts_with('.') && !host.ends_with('.')
        }
        None => false,
    }
}

/// Exactly ten decimal digits
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_personal_fields(request: &RegistrationRequest) -> RegistrationResult<()> {
    let fields = [
        ("name", &request.name),
        ("email", &request.email),
        ("mobile", &request.mobile),
        ("college", &request.college),
        ("year", &request.year),
    ];

    for (field, value) in fields {
        if value.trim().is_empty() {
            return Err(RegistrationError::validation(format!(
                "Missing required field: {}",
                field
            )));
        }
    }

    Ok(())
}

pub fn validate_payment_fields(request: &RegistrationRequest) -> RegistrationResult<()> {
    if request.transaction_id.trim().is_empty() {
        return Err(RegistrationError::validation("Transaction ID is required"));
    }

    match &request.screenshot {
        Some(screenshot) if !screenshot.bytes.is_empty() => Ok(()),
        _ => Err(RegistrationError::validation("Payment screenshot is required")),
    }
}

pub fn validate_contact_format(request: &RegistrationRequest) -> RegistrationResult<()> {
    if !is_valid_email(request.email.trim()) {
        return Err(RegistrationError::validation("Invalid email address"));
    }

    if !is_valid_mobile(request.mobile.trim()) {
        return Err(RegistrationError::validation("Mobile must be 10 digits"));
    }

    Ok(())
}
