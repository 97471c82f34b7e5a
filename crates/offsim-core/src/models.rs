//! Domain models for the offboarding simulator.
//!
//! Statuses, actions and severities are closed enums.

pub mod access_log;
pub mod account;
pub mod alert;
pub mod anomaly;
pub mod employee;
pub mod permission;
pub mod severity;
pub mod transfer;
