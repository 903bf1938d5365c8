//! Request validation for the auth routes.
//!
//! Shape checks run before authentication and before any store access.
//! All violated-field messages are collected and joined into a single
//! `Validation` error.

use serde::Deserialize;

use chirp_core::{is_valid_id, ServiceError};

use crate::model::{LoginInput, RegisterInput};

/// Raw register body, all fields optional so every violation is reported.
#[derive(Debug, Deserialize)]
pub struct RawRegister {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Raw login body.
#[derive(Debug, Deserialize)]
pub struct RawLogin {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub fn register(raw: RawRegister) -> Result<RegisterInput, ServiceError> {
    let mut problems = Vec::new();

    let username = raw.username.unwrap_or_default();
    if username.len() < 3 {
        problems.push("Username must be at least 3 characters long".to_string());
    } else if username.len() > 30 {
        problems.push("Username cannot exceed 30 characters".to_string());
    }
    if !username.is_empty()
        && !username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        problems
            .push("Username can only contain letters, numbers and underscores".to_string());
    }

    let email = raw.email.unwrap_or_default().trim().to_lowercase();
    if !plausible_email(&email) {
        problems.push("Invalid email address".to_string());
    }

    let password = raw.password.unwrap_or_default();
    if password.len() < 8 {
        problems.push("Password must be at least 8 characters long".to_string());
    } else if password.len() > 100 {
        problems.push("Password cannot exceed 100 characters".to_string());
    }

    if !problems.is_empty() {
        return Err(ServiceError::Validation(problems.join(", ")));
    }

    Ok(RegisterInput {
        username,
        email,
        password,
    })
}

pub fn login(raw: RawLogin) -> Result<LoginInput, ServiceError> {
    let mut problems = Vec::new();

    let email = raw.email.unwrap_or_default().trim().to_lowercase();
    if !plausible_email(&email) {
        problems.push("Invalid email address".to_string());
    }

    let password = raw.password.unwrap_or_default();
    if password.is_empty() {
        problems.push("Password is required".to_string());
    }

    if !problems.is_empty() {
        return Err(ServiceError::Validation(problems.join(", ")));
    }

    Ok(LoginInput { email, password })
}

/// Path id check for `GET /auth/{userId}`.
pub fn user_id(id: &str) -> Result<(), ServiceError> {
    if !is_valid_id(id) {
        return Err(ServiceError::InvalidId("Invalid user ID".to_string()));
    }
    Ok(())
}

/// `local@domain.tld` shape, no whitespace. Full RFC parsing is not the
/// point; the store-level uniqueness check is the real gate.
fn plausible_email(email: &str) -> bool {
    if email.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
