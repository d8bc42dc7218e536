//! Guard clauses run at the top of every service call.

use thiserror::Error;

use super::error::ServiceError;
use crate::domain::todo::{DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS, TimestampError, ToDo};

/// API revision implemented by this service.
pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported API version: service implements API version '{expected}', but asked for '{requested}'")]
    UnsupportedApi { expected: &'static str, requested: String },

    #[error("reminder field is required")]
    ReminderRequired,

    #[error("reminder field has invalid format: {0}")]
    InvalidReminder(#[from] TimestampError),

    #[error("title exceeds {max} characters (got {len})")]
    TitleTooLong { max: usize, len: usize },

    #[error("description exceeds {max} characters (got {len})")]
    DescriptionTooLong { max: usize, len: usize },
}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::UnsupportedApi { .. } => ServiceError::Unimplemented(e.to_string()),
            _ => ServiceError::InvalidArgument(e.to_string()),
        }
    }
}

/// An empty version means "current" and is accepted.
pub fn check_api(api: &str) -> Result<(), ValidationError> {
    if !api.is_empty() && api != API_VERSION {
        return Err(ValidationError::UnsupportedApi { expected: API_VERSION, requested: api.to_string() });
    }
    Ok(())
}

/// Field checks shared by Create and Update.
pub fn validate_todo(todo: &ToDo) -> Result<(), ValidationError> {
    todo.reminder.ok_or(ValidationError::ReminderRequired)?.validate()?;
    let len = todo.title.chars().count();
    if len > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong { max: TITLE_MAX_CHARS, len });
    }
    let len = todo.description.chars().count();
    if len > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong { max: DESCRIPTION_MAX_CHARS, len });
    }
    Ok(())
}
