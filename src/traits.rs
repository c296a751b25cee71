//! Traits for the engine's external collaborators
//!
//! The engine itself is a pure function; everything around it (where the
//! rules come from, where certificates go) is abstracted here so the core
//! can be wired to any backend.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CovenantResult, CovenantRules, ReconciliationReport};

/// A stored compliance certificate: one engine run frozen with its test date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Unique identifier for the stored certificate
    pub id: Uuid,
    /// Covenant test date the certificate speaks to
    pub as_of_date: NaiveDate,
    /// The engine output, stored verbatim
    pub report: ReconciliationReport,
    /// When the record was created
    pub created_at: NaiveDateTime,
}

impl CertificateRecord {
    /// Freeze a report into a certificate ready for storage
    pub fn from_report(report: ReconciliationReport, as_of_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            as_of_date,
            report,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl ReconciliationReport {
    /// Convenience wrapper over [`CertificateRecord::from_report`]
    pub fn certify(self, as_of_date: NaiveDate) -> CertificateRecord {
        CertificateRecord::from_report(self, as_of_date)
    }
}

/// Persistence abstraction for compliance certificates.
///
/// The engine output is stored verbatim; implementations carry no
/// reconciliation logic. Backends can be relational, document or in-memory
/// (see `utils::MemoryStore`).
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Persist a certificate
    async fn save_certificate(&mut self, record: &CertificateRecord) -> CovenantResult<()>;

    /// Fetch a certificate by id
    async fn get_certificate(&self, id: Uuid) -> CovenantResult<Option<CertificateRecord>>;

    /// List certificates, newest test date first, optionally bounded
    async fn list_certificates(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> CovenantResult<Vec<CertificateRecord>>;

    /// Remove a certificate
    async fn delete_certificate(&mut self, id: Uuid) -> CovenantResult<()>;
}

/// Source of covenant rules, typically an upstream extraction service that
/// has already parsed the facilities agreement
#[async_trait]
pub trait RuleExtractor: Send + Sync {
    /// Produce the rule set for a named agreement
    async fn extract_rules(&self, agreement_ref: &str) -> CovenantResult<CovenantRules>;
}
