use crate::errors::AuthError;
use crate::types::db::user;
use crate::types::internal::{CurrentUser, Permission};

/// Validate an email address shape: `local@domain` with a dotted domain
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = email.len() <= 64
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };

    if valid {
        Ok(())
    } else {
        Err(AuthError::validation("Invalid email address"))
    }
}

/// Validate a username: letters first, then letters, digits, dots or
/// underscores, at most 64 characters
pub fn validate_username(username: &str) -> Result<(), AuthError> {
    let mut chars = username.chars();

    let valid = username.len() <= 64
        && chars
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AuthError::validation(
            "Usernames must start with a letter and contain only letters, numbers, dots or underscores",
        ))
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() >= 8 {
        Ok(())
    } else {
        Err(AuthError::validation(
            "Passwords must be at least 8 characters long",
        ))
    }
}

/// Reject requests from accounts that have not confirmed their email
pub fn require_confirmed(found: &user::Model) -> Result<(), AuthError> {
    if found.confirmed {
        Ok(())
    } else {
        Err(AuthError::unconfirmed_account())
    }
}

/// Reject requesters whose role does not grant `perm`
pub fn authorize(current: &CurrentUser, perm: Permission) -> Result<(), AuthError> {
    if current.can(perm) {
        Ok(())
    } else {
        Err(AuthError::permission_denied())
    }
}
