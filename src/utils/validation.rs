//! Validation utilities for reconciliation inputs
//!
//! The engine itself never rejects data; these checks run at the boundary
//! so malformed batches are caught before a certificate is produced.

use std::collections::HashSet;

use bigdecimal::{BigDecimal, Zero};

use crate::types::{CovenantError, CovenantResult, CovenantRules, LedgerEntry};

/// Validate that entry ids are unique and non-empty across one batch
pub fn validate_entry_ids(entries: &[LedgerEntry]) -> CovenantResult<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.id.trim().is_empty() {
            return Err(CovenantError::Validation(
                "Ledger entry id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(CovenantError::Validation(format!(
                "Duplicate ledger entry id: {}",
                entry.id
            )));
        }
    }
    Ok(())
}

/// Validate that every entry carries an account name for the audit trail
pub fn validate_account_names(entries: &[LedgerEntry]) -> CovenantResult<()> {
    for entry in entries {
        if entry.account_name.trim().is_empty() {
            return Err(CovenantError::Validation(format!(
                "Ledger entry '{}' has an empty account name",
                entry.id
            )));
        }
    }
    Ok(())
}

/// Validate the extracted covenant rule set for obvious extraction faults
pub fn validate_covenant_rules(rules: &CovenantRules) -> CovenantResult<()> {
    for add_back in &rules.ebitda_rules.permitted_add_backs {
        if add_back.item.trim().is_empty() {
            return Err(CovenantError::Validation(
                "Permitted add-back with an empty item name".to_string(),
            ));
        }
    }
    for covenant in &rules.financial_covenants {
        if covenant.name.trim().is_empty() {
            return Err(CovenantError::Validation(
                "Financial covenant with an empty name".to_string(),
            ));
        }
        if covenant.max_limit.is_none() && covenant.min_limit.is_none() {
            return Err(CovenantError::Validation(format!(
                "Covenant '{}' carries neither a ceiling nor a floor",
                covenant.name
            )));
        }
    }
    if let Some(trigger) = &rules.covenant_trigger {
        if let Some(threshold) = &trigger.threshold_percentage {
            if *threshold < BigDecimal::zero() || *threshold > BigDecimal::from(1) {
                return Err(CovenantError::Validation(format!(
                    "Trigger threshold must be a fraction between 0 and 1, got {threshold}"
                )));
            }
        }
    }
    Ok(())
}

/// Run every boundary check over one reconciliation input set
pub fn validate_inputs(entries: &[LedgerEntry], rules: &CovenantRules) -> CovenantResult<()> {
    validate_entry_ids(entries)?;
    validate_account_names(entries)?;
    validate_covenant_rules(rules)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryCategory, FinancialCovenant};

    fn entry(id: &str) -> LedgerEntry {
        LedgerEntry::new(
            id,
            "1000",
            "Revenue",
            "SAP",
            BigDecimal::from(1),
            EntryCategory::Revenue,
        )
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let entries = vec![entry("a"), entry("a")];
        assert!(validate_entry_ids(&entries).is_err());
    }

    #[test]
    fn test_unique_ids_accepted() {
        let entries = vec![entry("a"), entry("b")];
        assert!(validate_entry_ids(&entries).is_ok());
    }

    #[test]
    fn test_covenant_without_limits_rejected() {
        let rules = CovenantRules {
            financial_covenants: vec![FinancialCovenant {
                name: "Leverage".to_string(),
                max_limit: None,
                min_limit: None,
            }],
            ..Default::default()
        };
        assert!(validate_covenant_rules(&rules).is_err());
    }

    #[test]
    fn test_trigger_threshold_range() {
        use crate::types::CovenantTrigger;
        let rules = CovenantRules {
            covenant_trigger: Some(CovenantTrigger {
                is_springing: true,
                total_rcf_amount: BigDecimal::from(100),
                threshold_percentage: Some(BigDecimal::from(40)),
                trigger_metric: None,
            }),
            ..Default::default()
        };
        assert!(validate_covenant_rules(&rules).is_err());
    }
}
