//! Lifecycle error types.

use chrono::{DateTime, Utc};
use offsim_core::error::SimError;
use offsim_core::ids::EmployeeId;
use offsim_core::models::employee::EmploymentStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("cannot {operation} employee {employee_id} while {from}")]
    InvalidTransition {
        employee_id: EmployeeId,
        operation: &'static str,
        from: EmploymentStatus,
    },

    #[error("employee {employee_id} works until {last_work_date}")]
    NotYetDue {
        employee_id: EmployeeId,
        last_work_date: DateTime<Utc>,
    },

    #[error("employee {0} has no resignation on record")]
    MissingResignation(EmployeeId),
}

impl From<LifecycleError> for SimError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::InvalidTransition {
                employee_id,
                operation,
                from,
            } => SimError::InvalidTransition {
                employee_id: employee_id.to_string(),
                operation: operation.into(),
                from: from.to_string(),
            },
            LifecycleError::NotYetDue {
                employee_id,
                last_work_date,
            } => SimError::NotYetDue {
                employee_id: employee_id.to_string(),
                last_work_date: last_work_date.to_rfc3339(),
            },
            LifecycleError::MissingResignation(id) => {
                SimError::Internal(format!("employee {id} has no resignation on record"))
            }
        }
    }
}
