//! Builder to assemble a target strategy from rules and settings.

use crate::config::{FlagSet, FLAG_GENERATE_ONLY_FIRST, FLAG_GENERATE_SOLUTION_TREE};
use crate::data::{NodeId, PatternId, Rule};
use crate::inference::{StrategyConfig, TargetStrategy};
use log::debug;

/// Build a [`TargetStrategy`] tier by tier.
pub struct StrategyBuilder {
    target: PatternId,
    config: StrategyConfig,
    arguments: Vec<NodeId>,
    tiers: Vec<Vec<Rule>>,
}

impl StrategyBuilder {
    /// Create a new builder with default configuration.
    pub fn new(target: PatternId) -> Self {
        Self {
            target,
            config: StrategyConfig::default(),
            arguments: Vec::new(),
            tiers: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: StrategyConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply every explicitly set flag to the configuration.
    pub fn apply_flags(mut self, flags: &FlagSet) -> Self {
        for (name, enabled) in flags.iter() {
            match name {
                FLAG_GENERATE_ONLY_FIRST => {
                    self.config.generate_only_first = enabled;
                }
                FLAG_GENERATE_SOLUTION_TREE => {
                    self.config.generate_solution_tree = enabled;
                }
                _ => {
                    debug!("Ignoring unknown flag {}", name);
                }
            }
        }
        self
    }

    pub fn max_firings(mut self, limit: usize) -> Self {
        self.config.max_firings = Some(limit);
        self
    }

    /// Argument hints used to ground the target and premises.
    pub fn arguments(mut self, arguments: impl IntoIterator<Item = NodeId>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// Add a tier below the ones added so far.
    pub fn tier(mut self, rules: Vec<Rule>) -> Self {
        self.tiers.push(rules);
        self
    }

    pub fn build(self) -> TargetStrategy {
        let mut strategy = TargetStrategy::with_config(self.target, self.config);
        strategy.set_arguments(self.arguments);
        for rules in self.tiers {
            strategy.add_tier(rules);
        }
        strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RuleId;
    use crate::inference::ExpressionNode;

    fn rule(pattern: u64) -> Rule {
        Rule::new(PatternId(pattern), ExpressionNode::atomic(PatternId(pattern)))
    }

    #[test]
    fn build_tiers_in_order() {
        let strategy = StrategyBuilder::new(PatternId(1))
            .arguments([NodeId(7)])
            .tier(vec![rule(2), rule(3)])
            .tier(vec![rule(4)])
            .build();

        assert_eq!(strategy.tier_count(), 2);
        assert_eq!(strategy.rules().len(), 3);
        assert_eq!(strategy.arguments(), &[NodeId(7)]);
        let third = strategy.rules().get(RuleId(3)).expect("rule 3");
        assert_eq!(third.formula, PatternId(4));
    }

    #[test]
    fn apply_flags() {
        let mut flags = FlagSet::new();
        flags.enable(FLAG_GENERATE_ONLY_FIRST);
        flags.disable(FLAG_GENERATE_SOLUTION_TREE);
        flags.enable("auto");

        let strategy = StrategyBuilder::new(PatternId(1))
            .apply_flags(&flags)
            .max_firings(10)
            .build();

        let config = strategy.config();
        assert!(config.generate_only_first);
        assert!(!config.generate_solution_tree);
        assert_eq!(config.max_firings, Some(10));
    }

    #[test]
    fn handle_empty_builder() {
        let strategy = StrategyBuilder::new(PatternId(1)).build();
        assert_eq!(strategy.tier_count(), 0);
        assert!(strategy.rules().is_empty());
    }
}
