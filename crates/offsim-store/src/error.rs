//! Store-specific error types and conversions.

use offsim_core::error::SimError;

/// Storage-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },
}

impl From<StoreError> for SimError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => SimError::NotFound { entity, id },
            StoreError::AlreadyExists { entity, id } => SimError::AlreadyExists { entity, id },
            other => SimError::Storage(other.to_string()),
        }
    }
}
