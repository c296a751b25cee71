//! Ratio derivation, springing-trigger evaluation and the compliance
//! state machine
//!
//! Leverage is evaluated strictly before interest cover. A breach is never
//! downgraded by a later signal and a warning is never overwritten by a
//! weaker one; the first setter wins at each severity.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use tracing::debug;

use crate::types::{
    CovenantRules, CovenantStatus, CovenantTrigger, EntryCategory, HeadroomMetrics, LedgerEntry,
    TriggerDetails,
};

/// Decimal places kept on computed ratios and utilization
const RATIO_SCALE: i64 = 4;

/// Leverage ceiling assumed when no leverage covenant is extracted
fn default_leverage_max() -> BigDecimal {
    BigDecimal::from(4)
}

/// Utilization threshold assumed when the trigger carries none (40%)
fn default_trigger_threshold() -> BigDecimal {
    BigDecimal::from(40) / BigDecimal::from(100)
}

/// Division with a defined zero result for a zero denominator.
/// Degenerate denominators are an expected input shape, not an error.
fn safe_ratio(numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
    if denominator.is_zero() {
        BigDecimal::zero()
    } else {
        (numerator / denominator).with_scale_round(RATIO_SCALE, RoundingMode::HalfUp)
    }
}

/// Resolve leverage ceiling and interest floor from the extracted covenant
/// list by case-insensitive name match, with documented defaults.
fn resolve_thresholds(rules: &CovenantRules) -> (BigDecimal, BigDecimal) {
    let mut leverage_max = default_leverage_max();
    let mut interest_min = BigDecimal::zero();
    for covenant in &rules.financial_covenants {
        let name = covenant.name.to_lowercase();
        if name.contains("leverage") {
            if let Some(max_limit) = &covenant.max_limit {
                leverage_max = max_limit.clone();
            }
        }
        if name.contains("interest") {
            if let Some(min_limit) = &covenant.min_limit {
                interest_min = min_limit.clone();
            }
        }
    }
    (leverage_max, interest_min)
}

/// Evaluate the springing trigger against the raw entry list.
///
/// The RCF drawdown is read off the first gross-debt entry whose account
/// name mentions the revolving facility; absent such an entry the drawdown
/// is zero and the test stays dormant.
fn evaluate_trigger(
    entries: &[LedgerEntry],
    trigger: &CovenantTrigger,
) -> (bool, TriggerDetails) {
    let rcf_drawdown = entries
        .iter()
        .find(|e| {
            if e.category != EntryCategory::GrossDebt {
                return false;
            }
            let name = e.account_name.to_lowercase();
            name.contains("rcf") || name.contains("revolving")
        })
        .map(|e| e.amount.clone())
        .unwrap_or_else(BigDecimal::zero);

    let total_rcf_capacity = trigger.total_rcf_amount.clone();
    let utilization = if total_rcf_capacity <= BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        safe_ratio(&rcf_drawdown, &total_rcf_capacity)
    };
    let threshold = trigger
        .threshold_percentage
        .clone()
        .unwrap_or_else(default_trigger_threshold);
    let active = utilization > threshold;
    debug!(%rcf_drawdown, %utilization, %threshold, active, "springing trigger evaluated");

    (
        active,
        TriggerDetails {
            rcf_drawdown,
            total_rcf_capacity,
            utilization,
            threshold,
        },
    )
}

/// Derive ratios, resolve thresholds, run the trigger and the status
/// machine. Ratios are always computed, even when the test is skipped.
pub fn evaluate_compliance(
    entries: &[LedgerEntry],
    rules: &CovenantRules,
    adjusted_ebitda: &BigDecimal,
    net_debt: &BigDecimal,
    net_finance_charges: &BigDecimal,
) -> HeadroomMetrics {
    let leverage_ratio = safe_ratio(net_debt, adjusted_ebitda);
    let interest_coverage_ratio = safe_ratio(adjusted_ebitda, net_finance_charges);
    let (leverage_max, interest_min) = resolve_thresholds(rules);

    let (test_condition_active, trigger_details) = match rules.covenant_trigger.as_ref() {
        Some(trigger) if trigger.is_springing => {
            let (active, details) = evaluate_trigger(entries, trigger);
            (active, Some(details))
        }
        // No trigger, or a non-springing one: covenants are always tested
        _ => (true, None),
    };

    let status = if !test_condition_active {
        CovenantStatus::Skipped
    } else {
        let mut status = CovenantStatus::Healthy;
        let leverage_warning_band = &leverage_max * BigDecimal::from(9) / BigDecimal::from(10);
        if leverage_ratio > leverage_max {
            status = CovenantStatus::Breach;
        } else if leverage_ratio > leverage_warning_band {
            status = CovenantStatus::Warning;
        }
        if status != CovenantStatus::Breach {
            let interest_warning_band =
                &interest_min * BigDecimal::from(11) / BigDecimal::from(10);
            if interest_coverage_ratio < interest_min {
                status = CovenantStatus::Breach;
            } else if interest_coverage_ratio < interest_warning_band
                && status != CovenantStatus::Warning
            {
                status = CovenantStatus::Warning;
            }
        }
        status
    };
    debug!(%leverage_ratio, %interest_coverage_ratio, ?status, "compliance resolved");

    let leverage_headroom = &leverage_max - &leverage_ratio;
    let interest_headroom = &interest_coverage_ratio - &interest_min;

    HeadroomMetrics {
        leverage_ratio,
        leverage_threshold: leverage_max,
        interest_coverage_ratio,
        interest_threshold: interest_min,
        status,
        leverage_headroom,
        interest_headroom,
        test_condition_active,
        trigger_details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinancialCovenant;

    fn rules_with_limits(leverage_max: i64, interest_min: i64) -> CovenantRules {
        CovenantRules {
            financial_covenants: vec![
                FinancialCovenant {
                    name: "Leverage Ratio".to_string(),
                    max_limit: Some(BigDecimal::from(leverage_max)),
                    min_limit: None,
                },
                FinancialCovenant {
                    name: "Interest Cover".to_string(),
                    max_limit: None,
                    min_limit: Some(BigDecimal::from(interest_min)),
                },
            ],
            ..Default::default()
        }
    }

    fn springing_rules(capacity: i64, threshold_pct: Option<&str>) -> CovenantRules {
        CovenantRules {
            covenant_trigger: Some(CovenantTrigger {
                is_springing: true,
                total_rcf_amount: BigDecimal::from(capacity),
                threshold_percentage: threshold_pct.map(|t| t.parse().unwrap()),
                trigger_metric: Some("RCF utilization".to_string()),
            }),
            ..Default::default()
        }
    }

    fn rcf_entry(amount: i64) -> LedgerEntry {
        LedgerEntry::new(
            "rcf1",
            "2100",
            "RCF Drawdown",
            "SAP",
            BigDecimal::from(amount),
            EntryCategory::GrossDebt,
        )
    }

    #[test]
    fn test_zero_denominators_give_zero_ratios() {
        let metrics = evaluate_compliance(
            &[],
            &CovenantRules::default(),
            &BigDecimal::zero(),
            &BigDecimal::from(500),
            &BigDecimal::zero(),
        );
        assert_eq!(metrics.leverage_ratio, BigDecimal::zero());
        assert_eq!(metrics.interest_coverage_ratio, BigDecimal::zero());
    }

    #[test]
    fn test_default_thresholds_when_covenants_absent() {
        let metrics = evaluate_compliance(
            &[],
            &CovenantRules::default(),
            &BigDecimal::from(100),
            &BigDecimal::from(200),
            &BigDecimal::from(10),
        );
        assert_eq!(metrics.leverage_threshold, BigDecimal::from(4));
        assert_eq!(metrics.interest_threshold, BigDecimal::zero());
        assert_eq!(metrics.status, CovenantStatus::Healthy);
    }

    #[test]
    fn test_leverage_breach_wins_over_interest_breach() {
        // leverage 5.0 over a 4.0 ceiling, interest cover 1.0 below a 2.0 floor
        let metrics = evaluate_compliance(
            &[],
            &rules_with_limits(4, 2),
            &BigDecimal::from(100),
            &BigDecimal::from(500),
            &BigDecimal::from(100),
        );
        assert_eq!(metrics.status, CovenantStatus::Breach);
    }

    #[test]
    fn test_leverage_warning_band() {
        // 3.8 against a 4.0 ceiling sits above the 3.6 warning band
        let metrics = evaluate_compliance(
            &[],
            &rules_with_limits(4, 0),
            &BigDecimal::from(100),
            &BigDecimal::from(380),
            &BigDecimal::from(10),
        );
        assert_eq!(metrics.status, CovenantStatus::Warning);
        assert_eq!(
            metrics.leverage_headroom,
            BigDecimal::from(4) - metrics.leverage_ratio.clone()
        );
    }

    #[test]
    fn test_interest_breach_when_leverage_clean() {
        let metrics = evaluate_compliance(
            &[],
            &rules_with_limits(4, 3),
            &BigDecimal::from(100),
            &BigDecimal::from(100),
            &BigDecimal::from(50),
        );
        // cover of 2.0 against a floor of 3.0
        assert_eq!(metrics.status, CovenantStatus::Breach);
    }

    #[test]
    fn test_leverage_warning_not_downgraded_by_interest_warning() {
        // leverage 3.8/4.0 => Warning; interest 3.1 against floor 3.0 is in
        // the 3.3 warning band but must not re-set the status
        let metrics = evaluate_compliance(
            &[],
            &rules_with_limits(4, 3),
            &BigDecimal::from(100),
            &BigDecimal::from(380),
            &BigDecimal::from(32),
        );
        assert_eq!(metrics.status, CovenantStatus::Warning);
    }

    #[test]
    fn test_springing_below_threshold_skips() {
        let entries = vec![rcf_entry(100)];
        let metrics = evaluate_compliance(
            &entries,
            &springing_rules(1000, None),
            &BigDecimal::from(10),
            &BigDecimal::from(500),
            &BigDecimal::from(5),
        );
        // 10% utilization against the 40% default
        assert_eq!(metrics.status, CovenantStatus::Skipped);
        assert!(!metrics.test_condition_active);
        // ratios still computed for reporting
        assert_eq!(metrics.leverage_ratio, BigDecimal::from(50));
        let details = metrics.trigger_details.unwrap();
        assert_eq!(details.utilization, "0.1000".parse::<BigDecimal>().unwrap());
    }

    #[test]
    fn test_springing_above_threshold_tests() {
        let entries = vec![rcf_entry(600)];
        let metrics = evaluate_compliance(
            &entries,
            &springing_rules(1000, Some("0.40")),
            &BigDecimal::from(100),
            &BigDecimal::from(200),
            &BigDecimal::from(10),
        );
        assert!(metrics.test_condition_active);
        assert_eq!(metrics.status, CovenantStatus::Healthy);
    }

    #[test]
    fn test_springing_zero_capacity_gives_zero_utilization() {
        let entries = vec![rcf_entry(600)];
        let metrics = evaluate_compliance(
            &entries,
            &springing_rules(0, None),
            &BigDecimal::from(100),
            &BigDecimal::from(200),
            &BigDecimal::from(10),
        );
        assert!(!metrics.test_condition_active);
        assert_eq!(
            metrics.trigger_details.unwrap().utilization,
            BigDecimal::zero()
        );
    }

    #[test]
    fn test_revolving_name_matches_trigger_entry() {
        let entry = LedgerEntry::new(
            "d1",
            "2100",
            "Revolving Credit Facility",
            "SAP",
            BigDecimal::from(500),
            EntryCategory::GrossDebt,
        );
        let metrics = evaluate_compliance(
            &[entry],
            &springing_rules(1000, None),
            &BigDecimal::from(100),
            &BigDecimal::from(200),
            &BigDecimal::from(10),
        );
        assert!(metrics.test_condition_active);
        assert_eq!(
            metrics.trigger_details.unwrap().rcf_drawdown,
            BigDecimal::from(500)
        );
    }
}
