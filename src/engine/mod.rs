//! The reconciliation engine
//!
//! A pure pipeline: categorized ledger entries plus extracted covenant rules
//! in, a complete reconciliation report out. No I/O, no shared state; two
//! runs over identical inputs produce identical reports.

pub mod classifier;
pub mod compliance;
pub mod debt;
pub mod ebitda;
pub mod pool;

use tracing::debug_span;

use crate::engine::compliance::evaluate_compliance;
use crate::engine::debt::{build_finance_charges, build_net_debt};
use crate::engine::ebitda::build_ebitda_bridge;
use crate::engine::pool::EntryPool;
use crate::types::{CovenantRules, FinancialHealth, LedgerEntry, ReconciliationReport};

/// Deterministic covenant reconciliation engine.
///
/// Stateless; the per-run consumed-entry arena lives inside [`run`] and is
/// dropped with it, so an engine value can be shared freely.
///
/// [`run`]: ReconciliationEngine::run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run one reconciliation: EBITDA bridge, finance charges, net debt,
    /// then ratio and compliance evaluation.
    ///
    /// Inputs are borrowed and never mutated. Add-back rules that match no
    /// remaining entries are silently omitted from the output; callers must
    /// treat a rule absent from the bridge as expected behaviour.
    pub fn run(
        &self,
        entries: &[LedgerEntry],
        rules: &CovenantRules,
    ) -> ReconciliationReport {
        let span = debug_span!("reconciliation_run", entries = entries.len());
        let _guard = span.enter();

        let mut pool = EntryPool::new(entries);

        let ebitda = build_ebitda_bridge(&mut pool, &rules.ebitda_rules);
        let charges = build_finance_charges(&mut pool);
        let debt = build_net_debt(&mut pool);

        let headroom = evaluate_compliance(
            entries,
            rules,
            &ebitda.adjusted_ebitda,
            &debt.net_debt,
            &charges.net_finance_charges,
        );

        let health = FinancialHealth {
            adjusted_ebitda: ebitda.adjusted_ebitda.clone(),
            net_debt: debt.net_debt.clone(),
            net_finance_charges: charges.net_finance_charges.clone(),
            gross_debt: debt.gross_debt,
            cash: debt.cash,
            operating_profit: ebitda.operating_profit,
            depreciation_total: ebitda.depreciation_total,
            restructuring_total: ebitda.restructuring_total,
            transaction_total: ebitda.transaction_total,
            unrealized_fx_total: ebitda.unrealized_fx_total,
            interest_expense_total: charges.finance_cost,
        };

        let mut reconciliation = ebitda.lines;
        reconciliation.extend(charges.lines);
        reconciliation.extend(debt.lines);

        ReconciliationReport {
            reconciliation,
            health,
            headroom,
        }
    }
}

/// Convenience free function for one-shot reconciliation
pub fn reconcile(entries: &[LedgerEntry], rules: &CovenantRules) -> ReconciliationReport {
    ReconciliationEngine::new().run(entries, rules)
}
