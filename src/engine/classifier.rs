//! Keyword classification of free-text add-back rule names
//!
//! Extracted rules arrive with free-text item names ("Exceptional
//! restructuring costs", "M&A advisory fees"). This module is the single
//! place where that text is mapped to canonical adjustment categories;
//! nothing else in the engine compares raw strings.

use serde::{Deserialize, Serialize};

use crate::types::EntryCategory;

/// Canonical categories an add-back rule can classify into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdjustmentCategory {
    DepreciationAmortization,
    Transaction,
    Restructuring,
    Fx,
}

impl AdjustmentCategory {
    /// The ledger entry category this adjustment draws entries from
    pub fn entry_category(&self) -> EntryCategory {
        match self {
            AdjustmentCategory::DepreciationAmortization => {
                EntryCategory::DepreciationAmortization
            }
            AdjustmentCategory::Transaction => EntryCategory::Transaction,
            AdjustmentCategory::Restructuring => EntryCategory::Restructuring,
            AdjustmentCategory::Fx => EntryCategory::Fx,
        }
    }
}

/// Keyword table driving the classification. Case-insensitive substring
/// match; families do not overlap in practice, but a name hitting several
/// families classifies into all of them.
const KEYWORD_TABLE: &[(AdjustmentCategory, &[&str])] = &[
    (
        AdjustmentCategory::DepreciationAmortization,
        &["depreciation", "amortization", "impairment"],
    ),
    (
        AdjustmentCategory::Transaction,
        &["transaction", "legal", "professional", "acquisition"],
    ),
    (
        AdjustmentCategory::Restructuring,
        &["restructuring", "redundancy", "reorganization", "exceptional"],
    ),
    (AdjustmentCategory::Fx, &["fx", "exchange"]),
];

/// Classify a free-text add-back name into zero or more categories.
///
/// Returns the union of all matching keyword families, in table order.
/// An unrecognized name returns an empty vector and the rule contributes
/// nothing to the bridge.
pub fn classify_add_back(item: &str) -> Vec<AdjustmentCategory> {
    let lowered = item.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(category, _)| *category)
        .collect()
}

/// Whether any exclusion clause carries FX wording, activating the
/// unrealized-gain carve-out
pub fn has_fx_exclusion(exclusions: &[String]) -> bool {
    exclusions.iter().any(|text| {
        let lowered = text.to_lowercase();
        lowered.contains("fx") || lowered.contains("exchange")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_depreciation_keywords() {
        assert_eq!(
            classify_add_back("Depreciation & Amortization"),
            vec![AdjustmentCategory::DepreciationAmortization]
        );
        assert_eq!(
            classify_add_back("goodwill IMPAIRMENT charge"),
            vec![AdjustmentCategory::DepreciationAmortization]
        );
    }

    #[test]
    fn test_classify_transaction_keywords() {
        for name in [
            "Transaction costs",
            "Legal fees",
            "Professional advisory",
            "Acquisition expenses",
        ] {
            assert_eq!(classify_add_back(name), vec![AdjustmentCategory::Transaction]);
        }
    }

    #[test]
    fn test_classify_restructuring_keywords() {
        for name in [
            "Restructuring programme",
            "Redundancy payments",
            "Reorganization charge",
            "Exceptional items",
        ] {
            assert_eq!(
                classify_add_back(name),
                vec![AdjustmentCategory::Restructuring]
            );
        }
    }

    #[test]
    fn test_classify_fx_keywords() {
        assert_eq!(classify_add_back("FX movements"), vec![AdjustmentCategory::Fx]);
        assert_eq!(
            classify_add_back("foreign exchange losses"),
            vec![AdjustmentCategory::Fx]
        );
    }

    #[test]
    fn test_unrecognized_name_returns_empty() {
        assert!(classify_add_back("Management fees").is_empty());
        assert!(classify_add_back("").is_empty());
    }

    #[test]
    fn test_multi_family_name_returns_union() {
        let categories = classify_add_back("Exceptional legal costs");
        assert_eq!(
            categories,
            vec![
                AdjustmentCategory::Transaction,
                AdjustmentCategory::Restructuring
            ]
        );
    }

    #[test]
    fn test_fx_exclusion_detection() {
        assert!(has_fx_exclusion(&["Unrealized FX gains".to_string()]));
        assert!(has_fx_exclusion(&["foreign exchange movements".to_string()]));
        assert!(!has_fx_exclusion(&["Fair value of derivatives".to_string()]));
        assert!(!has_fx_exclusion(&[]));
    }
}
