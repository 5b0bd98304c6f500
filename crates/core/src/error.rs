use crate::store::StoreError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Data access error: {0}")]
    DataAccess(#[from] StoreError),
}

impl CoreError {
    /// Shorthand for building an [`CoreError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        CoreError::InvalidArgument(msg.into())
    }
}
