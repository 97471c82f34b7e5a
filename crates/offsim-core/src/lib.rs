//! OFFSIM Core: domain models, configuration tables, repository
//! traits and error types shared by every crate in the workspace.

pub mod catalog;
pub mod error;
pub mod ids;
pub mod models;
pub mod repository;
pub mod sink;
pub mod weighted;

/// Static configuration version stamped on every JSON record.
pub const CONFIG_VERSION: &str = "1.0.0";
