//! Survey authoring and response errors

use std::collections::BTreeMap;

use thiserror::Error;

use super::core_error::{CoreError, CoreErrorKind};

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Template not found: {0}")]
    TemplateNotFound(i32),

    #[error("Survey not found: {0}")]
    SurveyNotFound(i32),

    #[error("Question not found: {0}")]
    QuestionNotFound(i32),

    #[error("Title is required")]
    MissingTitle,

    #[error("A template needs at least one question")]
    NoQuestions,

    #[error("Question {position} is invalid: {reason}")]
    InvalidQuestion { position: usize, reason: String },

    #[error("A question must keep at least two options")]
    TooFewOptions,

    #[error("Survey is not active")]
    Inactive,

    #[error("Survey has expired")]
    Expired,

    #[error("Survey has not started yet")]
    NotStarted,

    #[error("Survey already answered")]
    AlreadyAnswered,

    #[error("Required questions not answered")]
    MissingRequired(Vec<i32>),

    #[error("Invalid answer for question {question_id}: {reason}")]
    InvalidAnswer { question_id: i32, reason: String },

    #[error("Invalid date window: {0}")]
    InvalidWindow(String),
}

impl From<SurveyError> for CoreError {
    fn from(err: SurveyError) -> Self {
        match &err {
            SurveyError::TemplateNotFound(id) => CoreError::not_found("SurveyTemplate", id),
            SurveyError::SurveyNotFound(id) => CoreError::not_found("Survey", id),
            SurveyError::QuestionNotFound(id) => CoreError::not_found("Question", id),
            SurveyError::AlreadyAnswered => CoreError::conflict(err.to_string()),
            SurveyError::Inactive | SurveyError::Expired | SurveyError::NotStarted => {
                CoreError::new(CoreErrorKind::Forbidden, err.to_string())
            }
            SurveyError::MissingRequired(ids) => {
                let mut fields = BTreeMap::new();
                fields.insert(
                    "missing_questions".to_string(),
                    ids.iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join(","),
                );
                CoreError::validation(err.to_string()).with_fields(fields)
            }
            SurveyError::InvalidAnswer { question_id, reason } => {
                CoreError::invalid_field(format!("question_{}", question_id), reason.clone())
            }
            _ => CoreError::validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_lists_question_ids() {
        let err = CoreError::from(SurveyError::MissingRequired(vec![3, 5]));
        assert_eq!(err.kind(), CoreErrorKind::Validation);
        assert_eq!(
            err.fields().unwrap().get("missing_questions").unwrap(),
            "3,5"
        );
    }

    #[test]
    fn test_already_answered_is_conflict() {
        let err = CoreError::from(SurveyError::AlreadyAnswered);
        assert_eq!(err.kind(), CoreErrorKind::Conflict);
    }
}
