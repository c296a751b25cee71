//! In-memory certificate store for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::{CertificateRecord, CertificateStore};
use crate::types::{CovenantError, CovenantResult};

/// In-memory implementation of [`CertificateStore`], clone-able and shared
/// behind an `Arc` so tests can hold a handle alongside the store owner
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    certificates: Arc<RwLock<HashMap<Uuid, CertificateRecord>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        if let Ok(mut guard) = self.certificates.write() {
            guard.clear();
        }
    }
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn save_certificate(&mut self, record: &CertificateRecord) -> CovenantResult<()> {
        let mut guard = self
            .certificates
            .write()
            .map_err(|e| CovenantError::Storage(e.to_string()))?;
        guard.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_certificate(&self, id: Uuid) -> CovenantResult<Option<CertificateRecord>> {
        let guard = self
            .certificates
            .read()
            .map_err(|e| CovenantError::Storage(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_certificates(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> CovenantResult<Vec<CertificateRecord>> {
        let guard = self
            .certificates
            .read()
            .map_err(|e| CovenantError::Storage(e.to_string()))?;
        let mut records: Vec<CertificateRecord> = guard
            .values()
            .filter(|r| {
                from.is_none_or(|d| r.as_of_date >= d) && to.is_none_or(|d| r.as_of_date <= d)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| b.as_of_date.cmp(&a.as_of_date));
        Ok(records)
    }

    async fn delete_certificate(&mut self, id: Uuid) -> CovenantResult<()> {
        let mut guard = self
            .certificates
            .write()
            .map_err(|e| CovenantError::Storage(e.to_string()))?;
        if guard.remove(&id).is_none() {
            return Err(CovenantError::CertificateNotFound(id.to_string()));
        }
        Ok(())
    }
}
