//! Target-directed forward chaining over priority tiers of rules.
//!
//! Rules are tried one at a time in tier order.  A rule that writes new facts
//! sends the scan back to the first tier, since the new facts may enable
//! rules that were rejected earlier; the episode ends as soon as the target
//! pattern has a match.  Every firing rescans from the top, so the number of
//! rule attempts can grow quadratically with the number of firings.

use crate::config::{
    Statistics, STAT_RESTARTS, STAT_ROWS_GENERATED, STAT_RULES_FIRED, STAT_RULES_TRIED,
    STAT_TARGET_CHECKS,
};
use crate::data::{Assignment, NodeId, PatternId, Replacements, Rule, RuleArena, RuleId};
use crate::inference::{
    EvalContext, FormulaResult, InferenceError, SolutionTree, TierScheduler,
};
use crate::store::PatternStore;
use log::{debug, info};

/// Configuration for one inference episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyConfig {
    /// Stop generating a conclusion after its first new row.
    pub generate_only_first: bool,
    /// Record every firing in the solution tree.
    pub generate_solution_tree: bool,
    /// Maximum number of rule firings (None = unlimited)
    pub max_firings: Option<usize>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            generate_only_first: false,
            generate_solution_tree: true,
            max_firings: None,
        }
    }
}

/// How an episode ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// The target held before any rule fired; nothing was written.
    AlreadyAchieved,
    /// A firing made the target hold.
    Achieved { firings: usize },
    /// Every tier drained without reaching the target.
    Exhausted { firings: usize },
    /// The firing budget ran out first.
    ResourceLimit { firings: usize },
}

impl StrategyOutcome {
    /// Whether this episode made the target hold.
    pub fn target_achieved(&self) -> bool {
        matches!(self, StrategyOutcome::Achieved { .. })
    }

    pub fn firings(&self) -> usize {
        match self {
            StrategyOutcome::AlreadyAchieved => 0,
            StrategyOutcome::Achieved { firings }
            | StrategyOutcome::Exhausted { firings }
            | StrategyOutcome::ResourceLimit { firings } => *firings,
        }
    }
}

/// Forward-chaining driver for a single target pattern.
pub struct TargetStrategy {
    config: StrategyConfig,
    target: PatternId,
    /// Argument hints used to ground the target and compute premises.
    arguments: Vec<NodeId>,
    rules: RuleArena,
    /// Rule ids per tier, highest priority first.
    tiers: Vec<Vec<RuleId>>,
    solution: SolutionTree,
    stats: Statistics,
}

impl TargetStrategy {
    pub fn new(target: PatternId) -> Self {
        Self::with_config(target, StrategyConfig::default())
    }

    pub fn with_config(target: PatternId, config: StrategyConfig) -> Self {
        Self {
            config,
            target,
            arguments: Vec::new(),
            rules: RuleArena::new(),
            tiers: Vec::new(),
            solution: SolutionTree::new(),
            stats: Statistics::new(),
        }
    }

    /// Append a tier below the existing ones.
    pub fn add_tier(&mut self, rules: Vec<Rule>) -> Vec<RuleId> {
        let ids: Vec<RuleId> = rules.into_iter().map(|rule| self.rules.insert(rule)).collect();
        self.tiers.push(ids.clone());
        ids
    }

    pub fn set_arguments(&mut self, arguments: Vec<NodeId>) {
        self.arguments = arguments;
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut StrategyConfig {
        &mut self.config
    }

    pub fn target(&self) -> PatternId {
        self.target
    }

    pub fn arguments(&self) -> &[NodeId] {
        &self.arguments
    }

    pub fn rules(&self) -> &RuleArena {
        &self.rules
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Firings recorded by the last episode.
    pub fn solution_tree(&self) -> &SolutionTree {
        &self.solution
    }

    /// Counters of the last episode.
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Run one episode against `store`, tagging every written element as a
    /// member of the `output` structure.
    ///
    /// # Errors
    ///
    /// [`InferenceError::NoRuleSets`] is returned before the store is
    /// touched.  Store faults and unresolved variables abort the episode.
    pub fn apply_iteration_strategy<S>(
        &mut self,
        store: &mut S,
        output: NodeId,
    ) -> Result<StrategyOutcome, InferenceError>
    where
        S: PatternStore + ?Sized,
    {
        self.solution.clear();
        self.stats.clear();

        let mut scheduler = TierScheduler::new(&self.tiers)?;
        let candidates = store.create_assignments(self.target, &self.arguments)?;

        self.stats.increment(STAT_TARGET_CHECKS);
        if self.is_target_achieved(&*store, &candidates)? {
            debug!("Target {} already holds, nothing to do", self.target);
            return Ok(StrategyOutcome::AlreadyAchieved);
        }

        info!(
            "Applying {} rules in {} tiers to reach {}",
            self.rules.len(),
            scheduler.tier_count(),
            self.target
        );
        scheduler.start();
        let mut firings = 0;

        loop {
            if let Some(limit) = self.config.max_firings {
                if firings >= limit {
                    info!("Search stopped by max_firings limit ({})", limit);
                    return Ok(StrategyOutcome::ResourceLimit { firings });
                }
            }

            let Some(rule_id) = scheduler.next_rule() else {
                break;
            };
            let rule = self
                .rules
                .get(rule_id)
                .ok_or(InferenceError::UnknownRule(rule_id))?;
            debug!("Trying {} ({})", rule_id, rule.formula);
            self.stats.increment(STAT_RULES_TRIED);

            let result = {
                let mut ctx = EvalContext::new(&mut *store, output)
                    .with_arguments(&self.arguments)
                    .generate_only_first(self.config.generate_only_first);
                use_formula(rule, &mut ctx)?
            };

            if !result.is_generated {
                scheduler.reject();
                continue;
            }

            firings += 1;
            self.stats.increment(STAT_RULES_FIRED);
            self.stats
                .increment_by(STAT_ROWS_GENERATED, result.replacements.row_count() as u64);
            if self.config.generate_solution_tree {
                self.solution.add_node(
                    rule.formula,
                    result.replacements.to_assignments(),
                    result.replacements.key_names(),
                );
            }

            self.stats.increment(STAT_TARGET_CHECKS);
            if self.is_target_achieved(&*store, &candidates)? {
                debug!("{} reached target {}", rule_id, self.target);
                scheduler.succeed();
                return Ok(StrategyOutcome::Achieved { firings });
            }

            scheduler.progress();
            self.stats.increment(STAT_RESTARTS);
            debug!("{} fired, rescanning from the first tier", rule_id);
        }

        info!("Rule sets exhausted after {} firings", firings);
        Ok(StrategyOutcome::Exhausted { firings })
    }

    /// Whether the target matches under any of `candidates`.
    ///
    /// Each candidate is restricted to the target's own variables first.
    pub fn is_target_achieved<S>(
        &self,
        store: &S,
        candidates: &[Assignment],
    ) -> Result<bool, InferenceError>
    where
        S: PatternStore + ?Sized,
    {
        let names = store.var_names(self.target)?;
        for candidate in candidates {
            let restricted: Assignment = candidate
                .iter()
                .filter(|(name, _)| names.contains(*name))
                .map(|(name, node)| (name.clone(), node))
                .collect();
            if !store.search(self.target, &restricted)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Fire one rule: compute its premise, then generate its conclusion under
/// the premise's bindings.
fn use_formula<S>(rule: &Rule, ctx: &mut EvalContext<'_, S>) -> Result<FormulaResult, InferenceError>
where
    S: PatternStore + ?Sized,
{
    let rows = match &rule.premise {
        Some(premise) => {
            let result = premise.compute(&*ctx.store, ctx.arguments)?;
            if !result.value {
                debug!("Premise of {} does not hold", rule.formula);
                return Ok(FormulaResult::default());
            }
            if result.replacements.is_empty() {
                Replacements::unit()
            } else {
                result.replacements
            }
        }
        None => Replacements::unit(),
    };
    rule.conclusion.generate(ctx, &rows)
}
