//! Domain-specific error types
//!
//! Each subsystem raises its own `thiserror` enum; all of them convert into
//! [`CoreError`], which the HTTP layer maps onto status codes.
//!
//! - **AuthError**: sign-in, sessions, role checks
//! - **SurveyError**: template authoring and response validation
//! - **EventError**: registration and ratings
//! - **ImportExportError**: CSV intake and report export

pub mod auth;
pub mod core_error;
pub mod event;
pub mod import_export;
pub mod survey;

pub use auth::AuthError;
pub use core_error::{CoreError, CoreErrorKind, CoreResult};
pub use event::EventError;
pub use import_export::ImportExportError;
pub use survey::SurveyError;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for import/export operations
pub type ImportExportResult<T> = Result<T, ImportExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_result_alias() {
        let result: AuthResult<()> = Err(AuthError::InvalidCredentials);
        assert!(result.is_err());
    }

    #[test]
    fn test_import_export_result_alias() {
        let result: ImportExportResult<()> = Err(ImportExportError::EmptyFile);
        assert!(result.is_err());
    }
}
