use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use sea_orm::DbErr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreErrorKind {
    NotFound,
    Validation,
    Conflict,
    Forbidden,
    Unauthorized,
    Unavailable,
    Internal,
}

impl CoreErrorKind {
    /// Short machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            CoreErrorKind::NotFound => "NOT_FOUND",
            CoreErrorKind::Validation => "VALIDATION_FAILED",
            CoreErrorKind::Conflict => "CONFLICT",
            CoreErrorKind::Forbidden => "FORBIDDEN",
            CoreErrorKind::Unauthorized => "UNAUTHORIZED",
            CoreErrorKind::Unavailable => "UNAVAILABLE",
            CoreErrorKind::Internal => "INTERNAL",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug)]
pub struct CoreError {
    kind: CoreErrorKind,
    message: String,
    fields: Option<BTreeMap<String, String>>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CoreError {
    pub fn new(kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: None,
            source: None,
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        let entity = entity.into();
        let mut fields = BTreeMap::new();
        fields.insert("entity".to_string(), entity.clone());
        fields.insert("id".to_string(), id.to_string());

        Self {
            kind: CoreErrorKind::NotFound,
            message: format!("{} not found", entity),
            fields: Some(fields),
            source: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Validation, message)
    }

    /// Validation failure attached to a single input field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), message.clone());
        Self::validation(message).with_fields(fields)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Conflict, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Forbidden, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Unauthorized, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::Internal, message)
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, String>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> CoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> Option<&BTreeMap<String, String>> {
        self.fields.as_ref()
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl StdError for CoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<DbErr> for CoreError {
    fn from(err: DbErr) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();

        let kind = match &err {
            DbErr::RecordNotFound(_) => CoreErrorKind::NotFound,
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => CoreErrorKind::Unavailable,
            _ if lowered.contains("unique") => CoreErrorKind::Conflict,
            _ if lowered.contains("foreign key") => CoreErrorKind::Validation,
            _ => CoreErrorKind::Internal,
        };

        let public_message = match kind {
            CoreErrorKind::Conflict => "Record already exists".to_string(),
            CoreErrorKind::Validation => "Referenced record does not exist".to_string(),
            CoreErrorKind::Unavailable => "Database unavailable".to_string(),
            CoreErrorKind::NotFound => message,
            _ => "Database error".to_string(),
        };

        CoreError::new(kind, public_message).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_entity_fields() {
        let err = CoreError::not_found("Survey", 7);
        assert_eq!(err.kind(), CoreErrorKind::NotFound);
        assert_eq!(err.message(), "Survey not found");
        let fields = err.fields().unwrap();
        assert_eq!(fields.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let db_err = DbErr::Custom("UNIQUE constraint failed: profiles.email".to_string());
        let err = CoreError::from(db_err);
        assert_eq!(err.kind(), CoreErrorKind::Conflict);
        assert_eq!(err.message(), "Record already exists");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_field() {
        let err = CoreError::invalid_field("email", "Invalid email");
        assert_eq!(err.kind(), CoreErrorKind::Validation);
        assert_eq!(err.fields().unwrap().get("email").unwrap(), "Invalid email");
    }
}
