//! In-memory repository implementations.
//!
//! Each repository is a cheap handle around shared state, so clones
//! observe the same data.

mod access_log;
mod alert;
mod employee;
mod transfer;

pub use access_log::MemoryAccessLogRepository;
pub use alert::MemoryAlertRepository;
pub use employee::MemoryEmployeeRepository;
pub use transfer::MemoryTransferRepository;

use offsim_core::repository::{PaginatedResult, Pagination};

/// Slice a full, already ordered result set into one page.
pub(crate) fn paginate<T: Clone>(items: &[T], pagination: &Pagination) -> PaginatedResult<T> {
    let total = items.len() as u64;
    let start = pagination.offset.min(total) as usize;
    let end = pagination.offset.saturating_add(pagination.limit).min(total) as usize;
    PaginatedResult {
        items: items[start..end].to_vec(),
        total,
        offset: pagination.offset,
        limit: pagination.limit,
    }
}
