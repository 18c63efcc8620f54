//! Priority-tier scheduling for the target-directed driver.
//!
//! The scheduler owns one FIFO of untried rules per tier and a list of rules
//! rejected since the last firing.  It never touches the store; the driver
//! reports each rule's outcome through [`TierScheduler::reject`] or
//! [`TierScheduler::progress`].

use crate::data::{RuleId, RuleQueue};
use crate::inference::InferenceError;
use log::debug;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning { tier: usize },
    Success,
    Exhausted,
}

#[derive(Clone, Debug)]
pub struct TierScheduler {
    unchecked: Vec<RuleQueue>,
    checked: Vec<(usize, RuleId)>,
    in_flight: Option<(usize, RuleId)>,
    state: ScanState,
    restarts: usize,
}

impl TierScheduler {
    /// Build queues for `tiers`, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::NoRuleSets`] when `tiers` is empty.
    pub fn new(tiers: &[Vec<RuleId>]) -> Result<Self, InferenceError> {
        if tiers.is_empty() {
            return Err(InferenceError::NoRuleSets);
        }

        let unchecked = tiers
            .iter()
            .enumerate()
            .map(|(index, rules)| RuleQueue::from_rules(format!("tier {}", index + 1), rules))
            .collect();
        Ok(Self {
            unchecked,
            checked: Vec::new(),
            in_flight: None,
            state: ScanState::Idle,
            restarts: 0,
        })
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn tier_count(&self) -> usize {
        self.unchecked.len()
    }

    /// Rules still waiting in `tier`.
    pub fn pending(&self, tier: usize) -> usize {
        self.unchecked.get(tier).map_or(0, RuleQueue::len)
    }

    /// Rules rejected since the last firing, in rejection order.
    pub fn checked(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.checked.iter().map(|(_, rule)| *rule)
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn start(&mut self) {
        if self.state == ScanState::Idle {
            self.state = ScanState::Scanning { tier: 0 };
        }
    }

    /// Pop the next rule to try, moving to lower tiers as queues drain.
    ///
    /// Returns `None` once every tier is drained (state `Exhausted`) or the
    /// scan is not running.
    pub fn next_rule(&mut self) -> Option<RuleId> {
        loop {
            let ScanState::Scanning { tier } = self.state else {
                return None;
            };

            if let Some(rule) = self.unchecked[tier].pop() {
                self.in_flight = Some((tier, rule));
                return Some(rule);
            }

            if tier + 1 < self.unchecked.len() {
                debug!(
                    "{} drained, moving on with {} rules in {}",
                    self.unchecked[tier].name(),
                    self.unchecked[tier + 1].len(),
                    self.unchecked[tier + 1].name()
                );
                self.state = ScanState::Scanning { tier: tier + 1 };
            } else {
                debug!("All {} rule sets drained", self.unchecked.len());
                self.state = ScanState::Exhausted;
                return None;
            }
        }
    }

    /// The rule in flight produced nothing new.
    pub fn reject(&mut self) {
        if let Some(entry) = self.in_flight.take() {
            self.checked.push(entry);
        }
    }

    /// The rule in flight produced new facts but the target still fails.
    ///
    /// Every rejected rule goes back to the end of its tier's queue, followed
    /// by the rule that just fired, and scanning resumes at the first tier.
    pub fn progress(&mut self) {
        for (tier, rule) in self.checked.drain(..) {
            self.unchecked[tier].push(rule);
        }
        if let Some((tier, rule)) = self.in_flight.take() {
            self.unchecked[tier].push(rule);
        }
        self.restarts += 1;
        self.state = ScanState::Scanning { tier: 0 };
    }

    /// The target holds; nothing further is scheduled.
    pub fn succeed(&mut self) {
        self.in_flight = None;
        self.state = ScanState::Success;
    }
}
