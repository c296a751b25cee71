//! EBITDA bridge construction
//!
//! Walks from operating profit to adjusted EBITDA: permitted add-backs in
//! agreement order (with percentage-of-base capping), then the unrealized-FX
//! gain exclusion. Order matters: the cap base for a later rule includes the
//! depreciation add-backs already processed in the same pass.

use bigdecimal::{BigDecimal, Zero};
use tracing::debug;

use crate::engine::classifier::{classify_add_back, has_fx_exclusion, AdjustmentCategory};
use crate::engine::pool::{sum_abs, sum_signed, EntryPool};
use crate::types::{BridgeSection, EbitdaRules, EntryCategory, ReconciliationLine};

/// Percentage applied when cap text carries no parseable number
const DEFAULT_CAP_PERCENTAGE: u32 = 20;

/// Result of the EBITDA leg of the reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct EbitdaBridge {
    pub lines: Vec<ReconciliationLine>,
    pub operating_profit: BigDecimal,
    pub adjusted_ebitda: BigDecimal,
    pub depreciation_total: BigDecimal,
    pub restructuring_total: BigDecimal,
    pub transaction_total: BigDecimal,
    pub unrealized_fx_total: BigDecimal,
}

/// Whether the cap text actually encodes a cap
fn has_cap_language(text: &str) -> bool {
    text.contains('%') || text.to_lowercase().contains("cap")
}

/// Extract the leading integer percentage from free cap text
/// ("capped at 15% of EBITDA" → 15). Falls back to the default when the
/// text carries no digits.
fn parse_cap_percentage(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(DEFAULT_CAP_PERCENTAGE)
}

/// Build the EBITDA section of the bridge, consuming matched entries from
/// the pool as it goes.
pub fn build_ebitda_bridge(pool: &mut EntryPool<'_>, rules: &EbitdaRules) -> EbitdaBridge {
    let mut lines = Vec::new();

    // Starting line: operating profit from revenue and opex, both consumed
    // up front so no add-back can double-count them.
    let revenue_entries = pool.take_by_categories(&[EntryCategory::Revenue]);
    let opex_entries = pool.take_by_categories(&[EntryCategory::OpEx]);
    let revenue = sum_signed(&revenue_entries);
    let opex_abs = sum_abs(&opex_entries);
    let operating_profit = &revenue - &opex_abs;
    debug!(%revenue, %opex_abs, %operating_profit, "operating profit base");

    let starting_label = rules
        .starting_point
        .clone()
        .unwrap_or_else(|| "Operating Profit".to_string());
    let mut base_sources = revenue_entries;
    base_sources.extend(opex_entries);
    lines.push(ReconciliationLine {
        label: starting_label,
        source_entries: base_sources,
        raw_amount: operating_profit.clone(),
        is_add_back: false,
        is_deduction: false,
        capped_amount: None,
        final_amount: operating_profit.clone(),
        adjustment_reason: None,
        section: BridgeSection::Ebitda,
    });

    let mut running_ebitda = operating_profit.clone();
    let mut depreciation_total = BigDecimal::zero();
    let mut restructuring_total = BigDecimal::zero();
    let mut transaction_total = BigDecimal::zero();

    // Add-backs strictly in agreement order; a rule matching no remaining
    // entries emits nothing and moves no totals.
    for rule in &rules.permitted_add_backs {
        let categories = classify_add_back(&rule.item);
        if categories.is_empty() {
            debug!(item = %rule.item, "add-back rule did not classify, skipping");
            continue;
        }
        let entry_categories: Vec<EntryCategory> =
            categories.iter().map(|c| c.entry_category()).collect();
        let matches = pool.take_by_categories(&entry_categories);
        if matches.is_empty() {
            debug!(item = %rule.item, "no unconsumed entries for add-back, skipping");
            continue;
        }

        let raw_amount = sum_abs(&matches);
        let mut capped_amount = None;
        let mut adjustment_reason = None;
        let final_amount;

        match rule.cap.as_deref().filter(|text| has_cap_language(text)) {
            Some(cap_text) => {
                // Cap base is operating profit plus the depreciation
                // add-backs already processed in this pass, nothing else.
                let cap_base = &operating_profit + &depreciation_total;
                let pct = parse_cap_percentage(cap_text);
                let max_allowed =
                    &cap_base * BigDecimal::from(pct) / BigDecimal::from(100u32);
                if raw_amount > max_allowed {
                    capped_amount = Some(max_allowed.clone());
                    adjustment_reason = Some(format!("Capped at {pct}% of Base"));
                    final_amount = max_allowed;
                } else {
                    adjustment_reason = Some("Permitted (Within Cap)".to_string());
                    final_amount = raw_amount.clone();
                }
                if categories.contains(&AdjustmentCategory::Restructuring) {
                    restructuring_total += &final_amount;
                }
            }
            None => {
                final_amount = raw_amount.clone();
                if categories.contains(&AdjustmentCategory::Restructuring) {
                    restructuring_total += &raw_amount;
                } else {
                    if categories.contains(&AdjustmentCategory::DepreciationAmortization) {
                        depreciation_total += &raw_amount;
                    }
                    if categories.contains(&AdjustmentCategory::Transaction) {
                        transaction_total += &raw_amount;
                    }
                }
            }
        }

        running_ebitda += &final_amount;
        debug!(item = %rule.item, %raw_amount, %final_amount, %running_ebitda, "add-back applied");
        lines.push(ReconciliationLine {
            label: rule.item.clone(),
            source_entries: matches,
            raw_amount,
            is_add_back: true,
            is_deduction: false,
            capped_amount,
            final_amount,
            adjustment_reason,
            section: BridgeSection::Ebitda,
        });
    }

    // FX carve-out: only net unrealized gains are excluded. A net loss is
    // deliberately left untouched; the rule source treats losses as already
    // reflected in operating profit.
    let mut unrealized_fx_total = BigDecimal::zero();
    if has_fx_exclusion(&rules.exclusions) {
        let net_fx = sum_signed(
            &pool
                .peek_by_category(EntryCategory::Fx)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>(),
        );
        if net_fx > BigDecimal::zero() {
            let fx_entries = pool.take_by_categories(&[EntryCategory::Fx]);
            running_ebitda -= &net_fx;
            unrealized_fx_total = net_fx.clone();
            debug!(%net_fx, %running_ebitda, "unrealized FX gain deducted");
            lines.push(ReconciliationLine {
                label: "Unrealized FX Gains".to_string(),
                source_entries: fx_entries,
                raw_amount: net_fx.clone(),
                is_add_back: false,
                is_deduction: true,
                capped_amount: None,
                final_amount: -net_fx,
                adjustment_reason: Some("Excluded (Unrealized FX Gain)".to_string()),
                section: BridgeSection::Ebitda,
            });
        }
    }

    EbitdaBridge {
        lines,
        operating_profit,
        adjusted_ebitda: running_ebitda,
        depreciation_total,
        restructuring_total,
        transaction_total,
        unrealized_fx_total,
    }
}
