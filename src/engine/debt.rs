//! Net finance charges and net debt aggregation
//!
//! Straight sums over categorized entries; no classification or capping.
//! Each aggregate becomes its own bridge line so the certificate shows the
//! walk from gross debt to net debt and from cost to net charges.

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::engine::pool::{sum_abs, sum_signed, EntryPool};
use crate::types::{BridgeSection, EntryCategory, LedgerEntry, ReconciliationLine};

/// Result of the finance-charges leg
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceCharges {
    pub lines: Vec<ReconciliationLine>,
    pub finance_cost: BigDecimal,
    pub finance_income: BigDecimal,
    pub net_finance_charges: BigDecimal,
}

/// Result of the net-debt leg
#[derive(Debug, Clone, PartialEq)]
pub struct NetDebt {
    pub lines: Vec<ReconciliationLine>,
    pub gross_debt: BigDecimal,
    pub cash: BigDecimal,
    pub net_debt: BigDecimal,
}

fn aggregate_line(
    label: &str,
    source_entries: Vec<LedgerEntry>,
    raw_amount: BigDecimal,
    deduction: bool,
    section: BridgeSection,
) -> ReconciliationLine {
    let final_amount = if deduction {
        -raw_amount.clone()
    } else {
        raw_amount.clone()
    };
    ReconciliationLine {
        label: label.to_string(),
        source_entries,
        raw_amount,
        is_add_back: !deduction,
        is_deduction: deduction,
        capped_amount: None,
        final_amount,
        adjustment_reason: None,
        section,
    }
}

/// Build the finance-charges section: cost less income, income as a deduction
pub fn build_finance_charges(pool: &mut EntryPool<'_>) -> FinanceCharges {
    let cost_entries = pool.take_by_categories(&[EntryCategory::InterestExpense]);
    let income_entries = pool.take_by_categories(&[EntryCategory::InterestIncome]);
    let finance_cost = sum_abs(&cost_entries);
    let finance_income = sum_abs(&income_entries);
    let net_finance_charges = &finance_cost - &finance_income;
    debug!(%finance_cost, %finance_income, %net_finance_charges, "finance charges");

    let lines = vec![
        aggregate_line(
            "Interest Expense",
            cost_entries,
            finance_cost.clone(),
            false,
            BridgeSection::FinanceCharges,
        ),
        aggregate_line(
            "Interest Income",
            income_entries,
            finance_income.clone(),
            true,
            BridgeSection::FinanceCharges,
        ),
    ];

    FinanceCharges {
        lines,
        finance_cost,
        finance_income,
        net_finance_charges,
    }
}

/// Build the net-debt section: borrowings plus leases, less cash
pub fn build_net_debt(pool: &mut EntryPool<'_>) -> NetDebt {
    let debt_entries =
        pool.take_by_categories(&[EntryCategory::GrossDebt, EntryCategory::Leases]);
    let cash_entries = pool.take_by_categories(&[EntryCategory::Cash]);
    let gross_debt = sum_signed(&debt_entries);
    let cash = sum_signed(&cash_entries);
    let net_debt = &gross_debt - &cash;
    debug!(%gross_debt, %cash, %net_debt, "net debt");

    let lines = vec![
        aggregate_line(
            "Gross Debt (incl. Leases)",
            debt_entries,
            gross_debt.clone(),
            false,
            BridgeSection::NetDebt,
        ),
        aggregate_line(
            "Cash and Cash Equivalents",
            cash_entries,
            cash.clone(),
            true,
            BridgeSection::NetDebt,
        ),
    ];

    NetDebt {
        lines,
        gross_debt,
        cash,
        net_debt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerEntry;

    fn entry(id: &str, amount: i64, category: EntryCategory) -> LedgerEntry {
        LedgerEntry::new(id, "2000", id, "SAP", BigDecimal::from(amount), category)
    }

    #[test]
    fn test_finance_charges_nets_income_against_cost() {
        let entries = vec![
            entry("ie1", -80, EntryCategory::InterestExpense),
            entry("ie2", 20, EntryCategory::InterestExpense),
            entry("ii1", 15, EntryCategory::InterestIncome),
        ];
        let mut pool = EntryPool::new(&entries);
        let charges = build_finance_charges(&mut pool);
        assert_eq!(charges.finance_cost, BigDecimal::from(100));
        assert_eq!(charges.finance_income, BigDecimal::from(15));
        assert_eq!(charges.net_finance_charges, BigDecimal::from(85));
        assert!(charges.lines[1].is_deduction);
        assert_eq!(charges.lines[1].final_amount, BigDecimal::from(-15));
    }

    #[test]
    fn test_net_debt_includes_leases_and_deducts_cash() {
        let entries = vec![
            entry("loan", 900, EntryCategory::GrossDebt),
            entry("lease", 100, EntryCategory::Leases),
            entry("cash", 250, EntryCategory::Cash),
        ];
        let mut pool = EntryPool::new(&entries);
        let net = build_net_debt(&mut pool);
        assert_eq!(net.gross_debt, BigDecimal::from(1000));
        assert_eq!(net.cash, BigDecimal::from(250));
        assert_eq!(net.net_debt, BigDecimal::from(750));
        assert_eq!(net.lines[0].label, "Gross Debt (incl. Leases)");
        assert_eq!(net.lines[1].final_amount, BigDecimal::from(-250));
    }
}
