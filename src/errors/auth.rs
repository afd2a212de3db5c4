//! Authentication and authorisation error types

use thiserror::Error;

use super::core_error::{CoreError, CoreErrorKind};

/// Authentication and authorisation errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid credentials provided
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session not found
    #[error("Session not found")]
    SessionNotFound,

    /// Session has expired
    #[error("Session expired")]
    SessionExpired,

    /// Invalid email format
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password does not meet the minimum rules
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Missing or malformed display name
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Unknown role string
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Email already registered
    #[error("User already exists")]
    UserAlreadyExists,

    /// Profile does not exist
    #[error("User not found")]
    UserNotFound,

    /// Account is deactivated
    #[error("Account is deactivated")]
    AccountDeactivated,

    /// Caller's role may not perform the action
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Sign-up disabled while demo accounts are in use
    #[error("Sign-up is not available in demo mode")]
    SignUpDisabled,

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Database error during authentication
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AuthError {
    /// Check if this is an authentication error (401)
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::SessionNotFound | AuthError::SessionExpired
        )
    }

    /// Check if this is an authorisation error (403)
    pub fn is_authorisation_error(&self) -> bool {
        matches!(
            self,
            AuthError::PermissionDenied(_)
                | AuthError::AccountDeactivated
                | AuthError::SignUpDisabled
        )
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidName(_)
                | AuthError::InvalidRole(_)
        )
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            AuthError::InvalidEmail(_) => Some("email"),
            AuthError::WeakPassword(_) => Some("password"),
            AuthError::InvalidName(_) => Some("full_name"),
            AuthError::InvalidRole(_) => Some("role"),
            _ => None,
        }
    }
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        if let Some(field) = err.field() {
            return CoreError::invalid_field(field, err.to_string());
        }

        let kind = if err.is_authentication_error() {
            CoreErrorKind::Unauthorized
        } else if err.is_authorisation_error() {
            CoreErrorKind::Forbidden
        } else {
            match err {
                AuthError::UserAlreadyExists => CoreErrorKind::Conflict,
                AuthError::UserNotFound => CoreErrorKind::NotFound,
                AuthError::Database(db_err) => return CoreError::from(db_err),
                _ => CoreErrorKind::Internal,
            }
        };

        CoreError::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials() {
        let err = AuthError::InvalidCredentials;
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(err.is_authentication_error());
        assert_eq!(CoreError::from(err).kind(), CoreErrorKind::Unauthorized);
    }

    #[test]
    fn test_sign_up_disabled_is_forbidden() {
        let err = AuthError::SignUpDisabled;
        assert_eq!(err.to_string(), "Sign-up is not available in demo mode");
        assert_eq!(CoreError::from(err).kind(), CoreErrorKind::Forbidden);
    }

    #[test]
    fn test_weak_password_names_field() {
        let err = AuthError::WeakPassword("at least 6 characters".into());
        assert!(err.is_validation_error());
        let err = CoreError::from(err);
        assert_eq!(err.kind(), CoreErrorKind::Validation);
        assert!(err.fields().unwrap().contains_key("password"));
    }

    #[test]
    fn test_user_already_exists() {
        let err = AuthError::UserAlreadyExists;
        assert_eq!(CoreError::from(err).kind(), CoreErrorKind::Conflict);
    }
}
