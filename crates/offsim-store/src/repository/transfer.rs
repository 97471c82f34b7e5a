//! In-memory implementation of [`TransferRepository`].

use std::sync::Arc;

use offsim_core::error::SimResult;
use offsim_core::ids::EmployeeId;
use offsim_core::models::transfer::TransferRecord;
use offsim_core::repository::{PaginatedResult, Pagination, TransferRepository};
use parking_lot::RwLock;

use super::paginate;
use crate::error::StoreError;

/// Transfer records in creation order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransferRepository {
    records: Arc<RwLock<Vec<TransferRecord>>>,
}

impl MemoryTransferRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransferRepository for MemoryTransferRepository {
    fn create_many(&self, records: Vec<TransferRecord>) -> SimResult<()> {
        let mut stored = self.records.write();
        if let Some(dup) = records
            .iter()
            .find(|r| stored.iter().any(|existing| existing.id == r.id))
        {
            return Err(StoreError::AlreadyExists {
                entity: "transfer_record".into(),
                id: dup.id.to_string(),
            }
            .into());
        }
        stored.extend(records);
        Ok(())
    }

    fn list_for_employee(&self, employee_id: &EmployeeId) -> SimResult<Vec<TransferRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| &r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn update_many(&self, records: Vec<TransferRecord>) -> SimResult<()> {
        let mut stored = self.records.write();
        for record in records {
            let slot = stored
                .iter_mut()
                .find(|existing| existing.id == record.id)
                .ok_or_else(|| StoreError::NotFound {
                    entity: "transfer_record".into(),
                    id: record.id.to_string(),
                })?;
            *slot = record;
        }
        Ok(())
    }

    fn list(&self, pagination: Pagination) -> SimResult<PaginatedResult<TransferRecord>> {
        Ok(paginate(&self.records.read(), &pagination))
    }

    fn list_all(&self) -> SimResult<Vec<TransferRecord>> {
        Ok(self.records.read().clone())
    }
}
