//! Per-run entry arena with consumption tracking
//!
//! Every bridge step draws entries out of the pool; once drawn, an entry can
//! never contribute to a second line. The pool is created inside one engine
//! run and dropped with it, so consumption state cannot leak across runs.

use std::collections::HashSet;

use bigdecimal::{BigDecimal, Zero};

use crate::types::{EntryCategory, LedgerEntry};

/// Arena over the input entries for a single reconciliation run
pub struct EntryPool<'a> {
    entries: &'a [LedgerEntry],
    consumed: HashSet<&'a str>,
}

impl<'a> EntryPool<'a> {
    pub fn new(entries: &'a [LedgerEntry]) -> Self {
        Self {
            entries,
            consumed: HashSet::with_capacity(entries.len()),
        }
    }

    /// Draw all unconsumed entries in any of the given categories, marking
    /// them consumed. Input order is preserved.
    pub fn take_by_categories(&mut self, categories: &[EntryCategory]) -> Vec<LedgerEntry> {
        let mut taken = Vec::new();
        for entry in self.entries {
            if categories.contains(&entry.category) && self.consumed.insert(entry.id.as_str()) {
                taken.push(entry.clone());
            }
        }
        taken
    }

    /// Peek at unconsumed entries in a category without consuming them
    pub fn peek_by_category(&self, category: EntryCategory) -> Vec<&'a LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category && !self.consumed.contains(e.id.as_str()))
            .collect()
    }

    /// Number of entries not yet drawn into any line
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.consumed.len()
    }
}

/// Sum of absolute amounts over a set of entries
pub fn sum_abs(entries: &[LedgerEntry]) -> BigDecimal {
    entries
        .iter()
        .map(|e| e.amount.abs())
        .fold(BigDecimal::zero(), |acc, v| acc + v)
}

/// Signed sum over a set of entries
pub fn sum_signed(entries: &[LedgerEntry]) -> BigDecimal {
    entries
        .iter()
        .map(|e| e.amount.clone())
        .fold(BigDecimal::zero(), |acc, v| acc + v)
}
