//! Event registration and rating errors

use thiserror::Error;

use super::core_error::CoreError;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(i32),

    #[error("Category not found: {0}")]
    CategoryNotFound(i32),

    #[error("Event is not open for registration")]
    NotPublished,

    #[error("Event has already started")]
    AlreadyStarted,

    #[error("Event is full")]
    Full,

    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("Only registered participants can rate an event")]
    NotRegistered,

    #[error("Event already rated")]
    AlreadyRated,

    #[error("Invalid rating for {field}: {reason}")]
    InvalidRating { field: &'static str, reason: String },

    #[error("Invalid event: {0}")]
    Invalid(String),
}

impl From<EventError> for CoreError {
    fn from(err: EventError) -> Self {
        match &err {
            EventError::NotFound(id) => CoreError::not_found("Event", id),
            EventError::CategoryNotFound(id) => CoreError::not_found("EventCategory", id),
            EventError::AlreadyRegistered | EventError::AlreadyRated | EventError::Full => {
                CoreError::conflict(err.to_string())
            }
            EventError::NotRegistered => CoreError::forbidden(err.to_string()),
            EventError::InvalidRating { field, reason } => {
                CoreError::invalid_field(*field, reason.clone())
            }
            _ => CoreError::validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn test_full_event_is_conflict() {
        assert_eq!(CoreError::from(EventError::Full).kind(), CoreErrorKind::Conflict);
    }

    #[test]
    fn test_rating_without_registration_is_forbidden() {
        assert_eq!(
            CoreError::from(EventError::NotRegistered).kind(),
            CoreErrorKind::Forbidden
        );
    }
}
