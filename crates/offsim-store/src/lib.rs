//! OFFSIM Store: in-memory repository implementations and the sinks
//! that write simulated log streams.
//!
//! This crate provides:
//! - Repository implementations for the `offsim-core` traits
//!   ([`repository`])
//! - Line-delimited file output ([`FileSink`], [`SinkConfig`])
//! - A capturing sink for tests and report modes ([`MemorySink`])
//! - Error types ([`StoreError`])

mod error;
pub mod repository;
mod sink;

pub use error::StoreError;
pub use sink::{FileSink, MemorySink, SinkConfig};
