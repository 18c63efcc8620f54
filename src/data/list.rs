use super::containers::add_to_queue;
use super::RuleId;
use std::collections::VecDeque;

/// Named FIFO of rule identifiers; one per priority tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleQueue {
    name: String,
    members: VecDeque<RuleId>,
}

impl RuleQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: VecDeque::new(),
        }
    }

    pub fn from_rules(name: impl Into<String>, rules: &[RuleId]) -> Self {
        let mut queue = Self::new(name);
        queue.extend(rules);
        queue
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, id: RuleId) {
        self.members.push_back(id);
    }

    /// Append `ids` behind the current members.
    pub fn extend(&mut self, ids: &[RuleId]) {
        add_to_queue(ids, &mut self.members);
    }

    pub fn front(&self) -> Option<RuleId> {
        self.members.front().copied()
    }

    pub fn pop(&mut self) -> Option<RuleId> {
        self.members.pop_front()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleId> {
        self.members.iter()
    }
}
