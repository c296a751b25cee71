//! # Covenant Core
//!
//! A deterministic covenant-compliance engine: categorized ledger entries
//! plus extracted covenant rules in, an auditable reconciliation out.
//!
//! ## Features
//!
//! - **EBITDA bridge**: operating profit plus permitted add-backs, with
//!   percentage-of-base capping and the unrealized-FX gain exclusion
//! - **Net-debt bridge**: gross debt (including leases) less cash
//! - **Finance charges**: interest cost net of interest income
//! - **Compliance**: leverage and interest-cover ratios against extracted
//!   thresholds, springing-test activation, headroom reporting
//! - **Storage abstraction**: backend-agnostic certificate persistence via
//!   trait-based collaborators
//!
//! ## Quick Start
//!
//! ```rust
//! use covenant_core::{reconcile, CovenantRules, EntryCategory, LedgerEntry};
//! use bigdecimal::BigDecimal;
//!
//! let entries = vec![
//!     LedgerEntry::new("r1", "4000", "Revenue", "SAP", BigDecimal::from(1_000), EntryCategory::Revenue),
//!     LedgerEntry::new("o1", "5000", "Operating costs", "SAP", BigDecimal::from(-600), EntryCategory::OpEx),
//! ];
//! let report = reconcile(&entries, &CovenantRules::default());
//! assert_eq!(report.health.operating_profit, BigDecimal::from(400));
//! ```

pub mod engine;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use engine::classifier::{classify_add_back, AdjustmentCategory};
pub use engine::{reconcile, ReconciliationEngine};
pub use traits::*;
pub use types::*;
