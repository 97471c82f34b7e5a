//! In-memory implementation of [`EmployeeRepository`].

use std::collections::BTreeMap;
use std::sync::Arc;

use offsim_core::error::SimResult;
use offsim_core::ids::EmployeeId;
use offsim_core::models::employee::{Employee, EmploymentStatus};
use offsim_core::repository::{EmployeeRepository, PaginatedResult, Pagination};
use parking_lot::RwLock;

use super::paginate;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Directory {
    active: BTreeMap<EmployeeId, Employee>,
    resigned: BTreeMap<EmployeeId, Employee>,
}

impl Directory {
    fn collection_for(&mut self, status: EmploymentStatus) -> &mut BTreeMap<EmployeeId, Employee> {
        match status {
            EmploymentStatus::Resigned => &mut self.resigned,
            EmploymentStatus::Active | EmploymentStatus::ResignationPending => &mut self.active,
        }
    }
}

/// Employee directory split into active and resigned collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryEmployeeRepository {
    inner: Arc<RwLock<Directory>>,
}

impl MemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: &EmployeeId) -> StoreError {
    StoreError::NotFound {
        entity: "employee".into(),
        id: id.to_string(),
    }
}

impl EmployeeRepository for MemoryEmployeeRepository {
    fn insert(&self, employee: Employee) -> SimResult<()> {
        let mut dir = self.inner.write();
        if dir.active.contains_key(&employee.id) || dir.resigned.contains_key(&employee.id) {
            return Err(StoreError::AlreadyExists {
                entity: "employee".into(),
                id: employee.id.to_string(),
            }
            .into());
        }
        dir.collection_for(employee.status)
            .insert(employee.id.clone(), employee);
        Ok(())
    }

    fn get(&self, id: &EmployeeId) -> SimResult<Employee> {
        let dir = self.inner.read();
        dir.active
            .get(id)
            .or_else(|| dir.resigned.get(id))
            .cloned()
            .ok_or_else(|| not_found(id).into())
    }

    fn update(&self, employee: Employee) -> SimResult<()> {
        let mut dir = self.inner.write();
        let existed = dir.active.remove(&employee.id).is_some()
            | dir.resigned.remove(&employee.id).is_some();
        if !existed {
            return Err(not_found(&employee.id).into());
        }
        dir.collection_for(employee.status)
            .insert(employee.id.clone(), employee);
        Ok(())
    }

    fn contains(&self, id: &EmployeeId) -> bool {
        let dir = self.inner.read();
        dir.active.contains_key(id) || dir.resigned.contains_key(id)
    }

    fn list_active(&self) -> SimResult<Vec<Employee>> {
        Ok(self.inner.read().active.values().cloned().collect())
    }

    fn list_resigned(&self) -> SimResult<Vec<Employee>> {
        Ok(self.inner.read().resigned.values().cloned().collect())
    }

    fn list(&self, pagination: Pagination) -> SimResult<PaginatedResult<Employee>> {
        let dir = self.inner.read();
        let all: Vec<Employee> = dir
            .active
            .values()
            .chain(dir.resigned.values())
            .cloned()
            .collect();
        Ok(paginate(&all, &pagination))
    }

    fn count(&self) -> u64 {
        let dir = self.inner.read();
        (dir.active.len() + dir.resigned.len()) as u64
    }
}
