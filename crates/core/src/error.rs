use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A scoped write or delete touched zero rows. Either the row does not
    /// exist or it lives outside the caller's scope.
    #[error("Entity not found or access denied: {entity} with id {id}")]
    NotFoundOrDenied { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] keyed by a UUID.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
