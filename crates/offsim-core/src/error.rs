//! Error types for the offboarding simulator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },

    #[error("Invalid lifecycle transition for {employee_id}: cannot {operation} from {from}")]
    InvalidTransition {
        employee_id: String,
        operation: String,
        from: String,
    },

    #[error("Resignation of {employee_id} is not due until {last_work_date}")]
    NotYetDue {
        employee_id: String,
        last_work_date: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Serialization(err.to_string())
    }
}

pub type SimResult<T> = Result<T, SimError>;
