use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed")]
    Invalid(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Cycle detected in the ancestor chain of page {id}")]
    CycleDetected { id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap accumulated field errors, which must be non-empty.
    pub fn invalid(errors: FieldErrors) -> Self {
        debug_assert!(!errors.is_empty());
        Self::Invalid(errors)
    }
}
