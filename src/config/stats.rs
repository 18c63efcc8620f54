use std::collections::BTreeMap;

/// Rules popped from a tier queue and evaluated.
pub const STAT_RULES_TRIED: &str = "rules_tried";
/// Rules whose conclusion wrote at least one new fact.
pub const STAT_RULES_FIRED: &str = "rules_fired";
/// Rescans from the first tier after a firing that missed the target.
pub const STAT_RESTARTS: &str = "restarts";
/// Binding rows produced by firings.
pub const STAT_ROWS_GENERATED: &str = "rows_generated";
/// Searches for the target pattern.
pub const STAT_TARGET_CHECKS: &str = "target_checks";

/// Named counters for one inference episode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    counters: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, name: impl Into<String>) -> u64 {
        self.increment_by(name, 1)
    }

    pub fn increment_by(
        &mut self,
        name: impl Into<String>,
        amount: u64,
    ) -> u64 {
        let entry = self.counters.entry(name.into()).or_insert(0);
        *entry += amount;
        *entry
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }

    /// Counters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }
}
