//! In-memory implementation of [`AlertRepository`].

use std::sync::Arc;

use offsim_core::error::SimResult;
use offsim_core::models::alert::{SecurityIncident, ViolationAlert};
use offsim_core::repository::AlertRepository;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct AlertLog {
    alerts: Vec<ViolationAlert>,
    incidents: Vec<SecurityIncident>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAlertRepository {
    inner: Arc<RwLock<AlertLog>>,
}

impl MemoryAlertRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertRepository for MemoryAlertRepository {
    fn record(&self, alert: ViolationAlert, incident: SecurityIncident) -> SimResult<()> {
        let mut log = self.inner.write();
        log.alerts.push(alert);
        log.incidents.push(incident);
        Ok(())
    }

    fn list_alerts(&self) -> SimResult<Vec<ViolationAlert>> {
        Ok(self.inner.read().alerts.clone())
    }

    fn list_incidents(&self) -> SimResult<Vec<SecurityIncident>> {
        Ok(self.inner.read().incidents.clone())
    }
}
