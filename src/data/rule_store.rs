use super::{Rule, RuleId};

/// Storage for rules that also assigns unique identifiers.
#[derive(Default, Debug, Clone)]
pub struct RuleArena {
    rules: Vec<Rule>,
}

impl RuleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut rule: Rule) -> RuleId {
        // Ids start at 1 and map onto `index + 1`.
        let id = RuleId(self.rules.len() as u64 + 1);
        rule.id = Some(id);
        self.rules.push(rule);
        id
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}
