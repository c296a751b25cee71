//! Core types and data structures for covenant reconciliation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Fixed categories a ledger entry can carry, assigned upstream by the
/// ledger source before the entry reaches the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryCategory {
    /// Top-line revenue
    Revenue,
    /// Operating expenses (raw sign may be negative in the source system)
    OpEx,
    /// Depreciation, amortization and impairment charges
    DepreciationAmortization,
    /// Restructuring, redundancy and other exceptional costs
    Restructuring,
    /// Transaction, legal and professional fees
    Transaction,
    /// Foreign-exchange gains and losses
    Fx,
    /// Interest and similar finance costs
    InterestExpense,
    /// Interest earned on deposits and similar
    InterestIncome,
    /// Borrowings: loans, notes, drawn facilities
    GrossDebt,
    /// Cash and cash equivalents
    Cash,
    /// Capitalized lease liabilities
    Leases,
}

/// A single categorized line item supplied by the ledger source.
///
/// Entries are immutable inputs; the engine never mutates them, it only
/// tracks which ids it has already drawn into a bridge line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier within one reconciliation run
    pub id: String,
    /// General-ledger account code
    pub account_code: String,
    /// Human-readable account name
    pub account_name: String,
    /// Provenance tag (e.g. "SAP", "NetSuite")
    pub source_system: String,
    /// Signed amount in major currency units
    pub amount: BigDecimal,
    /// Category assigned by the ledger source
    pub category: EntryCategory,
}

impl LedgerEntry {
    /// Create a new ledger entry
    pub fn new(
        id: impl Into<String>,
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        source_system: impl Into<String>,
        amount: BigDecimal,
        category: EntryCategory,
    ) -> Self {
        Self {
            id: id.into(),
            account_code: account_code.into(),
            account_name: account_name.into(),
            source_system: source_system.into(),
            amount,
            category,
        }
    }
}

/// A permitted add-back rule extracted from the facilities agreement.
///
/// The `item` name is free text; the engine classifies it against a fixed
/// keyword table rather than trusting any upstream tagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AddBackRule {
    /// Free-text name of the adjustment (e.g. "Exceptional restructuring costs")
    pub item: String,
    /// Clause-level justification quoted from the agreement
    pub legal_logic: String,
    /// Optional hint mapping the rule to source-system accounts
    pub sap_mapping_hint: Option<String>,
    /// Optional cap text; may encode a percentage ("capped at 15% of EBITDA")
    pub cap: Option<String>,
}

/// EBITDA definition section of the extracted covenant rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EbitdaRules {
    /// Display label for the P&L base line
    pub starting_point: Option<String>,
    /// Permitted add-backs in agreement order; order is a hard contract
    /// because percentage caps reference running subtotals
    pub permitted_add_backs: Vec<AddBackRule>,
    /// Free-text exclusions; FX wording activates the unrealized-gain carve-out
    pub exclusions: Vec<String>,
}

/// A named financial covenant with its limit(s)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialCovenant {
    /// Covenant name as extracted (matched case-insensitively on
    /// "leverage" / "interest")
    pub name: String,
    /// Ceiling, for ratios tested from above (leverage)
    pub max_limit: Option<BigDecimal>,
    /// Floor, for ratios tested from below (interest cover)
    pub min_limit: Option<BigDecimal>,
}

/// Springing-test configuration, present when the agreement only tests
/// covenants above a utilization threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovenantTrigger {
    /// Whether the covenant is springing at all
    pub is_springing: bool,
    /// Total revolving facility commitment
    pub total_rcf_amount: BigDecimal,
    /// Utilization fraction above which the test activates (default 0.40)
    pub threshold_percentage: Option<BigDecimal>,
    /// Free-text description of the metric the trigger watches
    pub trigger_metric: Option<String>,
}

/// Complete covenant rule set supplied by the rule extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CovenantRules {
    pub ebitda_rules: EbitdaRules,
    pub financial_covenants: Vec<FinancialCovenant>,
    pub covenant_trigger: Option<CovenantTrigger>,
}

/// Which bridge a reconciliation line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BridgeSection {
    Ebitda,
    NetDebt,
    FinanceCharges,
}

/// One row of the reconciliation bridge.
///
/// Sign convention: `final_amount` is positive for add-backs and negative
/// for deductions, regardless of the raw signs of the source entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationLine {
    /// Display label for the row
    pub label: String,
    /// Ledger entries this row consumed; an entry appears in at most one line
    pub source_entries: Vec<LedgerEntry>,
    /// Amount before capping and sign normalization
    pub raw_amount: BigDecimal,
    pub is_add_back: bool,
    pub is_deduction: bool,
    /// Set only when a percentage cap reduced the raw amount
    pub capped_amount: Option<BigDecimal>,
    /// Signed amount that entered the running total
    pub final_amount: BigDecimal,
    /// Justification recorded for the audit trail
    pub adjustment_reason: Option<String>,
    pub section: BridgeSection,
}

/// Aggregate financial scalars derived during one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealth {
    pub adjusted_ebitda: BigDecimal,
    pub net_debt: BigDecimal,
    pub net_finance_charges: BigDecimal,
    pub gross_debt: BigDecimal,
    pub cash: BigDecimal,
    pub operating_profit: BigDecimal,
    /// Running subtotals by adjustment category
    pub depreciation_total: BigDecimal,
    pub restructuring_total: BigDecimal,
    pub transaction_total: BigDecimal,
    pub unrealized_fx_total: BigDecimal,
    pub interest_expense_total: BigDecimal,
}

/// Compliance status after evaluating the covenants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CovenantStatus {
    /// Both ratios comfortably within limits
    Healthy,
    /// Within limits but inside the warning band (90% of the leverage
    /// ceiling, 110% of the interest floor)
    Warning,
    /// At least one covenant limit exceeded
    Breach,
    /// Springing test not activated; ratios computed but not tested
    Skipped,
}

/// Springing-trigger evaluation detail, emitted whenever a trigger is present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDetails {
    /// Drawdown found on the RCF / revolving gross-debt entry (0 if none)
    pub rcf_drawdown: BigDecimal,
    /// Total facility commitment from the trigger configuration
    pub total_rcf_capacity: BigDecimal,
    /// Drawdown divided by capacity (0 when capacity is not positive)
    pub utilization: BigDecimal,
    /// Utilization level above which the test activates
    pub threshold: BigDecimal,
}

/// Ratio results, thresholds and headroom for the compliance snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadroomMetrics {
    /// Net debt / adjusted EBITDA (0 when adjusted EBITDA is 0)
    pub leverage_ratio: BigDecimal,
    pub leverage_threshold: BigDecimal,
    /// Adjusted EBITDA / net finance charges (0 when charges are 0)
    pub interest_coverage_ratio: BigDecimal,
    pub interest_threshold: BigDecimal,
    pub status: CovenantStatus,
    /// Distance below the leverage ceiling (negative when breached)
    pub leverage_headroom: BigDecimal,
    /// Distance above the interest floor (negative when breached)
    pub interest_headroom: BigDecimal,
    /// Whether the covenants were actually tested this run
    pub test_condition_active: bool,
    pub trigger_details: Option<TriggerDetails>,
}

/// Full engine output: the bridge, the scalar snapshot and the compliance
/// verdict. Self-contained and serializable; the caller owns persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub reconciliation: Vec<ReconciliationLine>,
    pub health: FinancialHealth,
    pub headroom: HeadroomMetrics,
}

/// Errors that can occur at the boundaries of the covenant system.
///
/// The reconciliation engine itself is total: degenerate inputs produce
/// documented fallback values, never errors. These variants cover input
/// validation and the collaborator seams (store, extractor).
#[derive(Debug, thiserror::Error)]
pub enum CovenantError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Rule extraction error: {0}")]
    Extraction(String),
    #[error("Certificate not found: {0}")]
    CertificateNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for covenant operations
pub type CovenantResult<T> = Result<T, CovenantError>;
