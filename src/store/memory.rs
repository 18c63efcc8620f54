//! In-memory triple store implementing [`PatternStore`].
//!
//! Facts are `(subject, predicate, object)` triples, each identified by an
//! edge handle.  Patterns are conjunctions of triple templates whose slots
//! are either concrete nodes or named variables.  Committing an instance
//! creates a fresh node for every variable the assignment left open.

use super::{CommitOutcome, PatternStore, StoreError};
use crate::data::{Assignment, BindingError, NodeId, PatternId, Replacements};
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};

/// One position of a triple template.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Node(NodeId),
    Var(String),
}

impl Slot {
    pub fn var(name: impl Into<String>) -> Self {
        Slot::Var(name.into())
    }

    fn resolve(&self, bindings: &Assignment) -> Option<NodeId> {
        match self {
            Slot::Node(node) => Some(*node),
            Slot::Var(name) => bindings.get(name),
        }
    }

    /// Match `value` against this slot, extending `bindings` for open variables.
    fn unify(&self, value: NodeId, bindings: &mut Assignment) -> bool {
        match self {
            Slot::Node(node) => *node == value,
            Slot::Var(name) => match bindings.get(name) {
                Some(bound) => bound == value,
                None => {
                    bindings.bind(name.clone(), value);
                    true
                }
            },
        }
    }
}

impl From<NodeId> for Slot {
    fn from(node: NodeId) -> Self {
        Slot::Node(node)
    }
}

impl From<&str> for Slot {
    fn from(name: &str) -> Self {
        Slot::var(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: Slot,
    pub predicate: Slot,
    pub object: Slot,
}

impl TriplePattern {
    pub fn new(subject: impl Into<Slot>, predicate: impl Into<Slot>, object: impl Into<Slot>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    fn slots(&self) -> [&Slot; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    fn bind(&self, bindings: &Assignment) -> TriplePattern {
        let bind_slot = |slot: &Slot| match slot.resolve(bindings) {
            Some(node) => Slot::Node(node),
            None => slot.clone(),
        };
        TriplePattern {
            subject: bind_slot(&self.subject),
            predicate: bind_slot(&self.predicate),
            object: bind_slot(&self.object),
        }
    }
}

#[derive(Clone, Debug)]
struct Fact {
    subject: NodeId,
    predicate: NodeId,
    object: NodeId,
}

/// Instance prepared by [`MemoryStore::build_instance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryInstance {
    pattern: PatternId,
    triples: Vec<TriplePattern>,
    bindings: Assignment,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    next_node: u64,
    next_pattern: u64,
    names: HashMap<String, NodeId>,
    facts: Vec<Fact>,
    patterns: HashMap<PatternId, Vec<TriplePattern>>,
    structures: HashMap<NodeId, BTreeSet<NodeId>>,
    reject_writes: bool,
    searches: Cell<usize>,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node registered under `name`, created on first use.
    pub fn node(&mut self, name: &str) -> NodeId {
        if let Some(node) = self.names.get(name) {
            return *node;
        }
        let node = self.fresh_node();
        self.names.insert(name.to_string(), node);
        node
    }

    pub fn fresh_node(&mut self) -> NodeId {
        self.next_node += 1;
        NodeId(self.next_node)
    }

    /// Insert a fact and return its edge handle.
    pub fn insert_fact(&mut self, subject: NodeId, predicate: NodeId, object: NodeId) -> NodeId {
        let edge = self.fresh_node();
        self.facts.push(Fact {
            subject,
            predicate,
            object,
        });
        edge
    }

    pub fn has_fact(&self, subject: NodeId, predicate: NodeId, object: NodeId) -> bool {
        self.facts.iter().any(|fact| {
            fact.subject == subject && fact.predicate == predicate && fact.object == object
        })
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn add_pattern(&mut self, triples: Vec<TriplePattern>) -> PatternId {
        self.next_pattern += 1;
        let id = PatternId(self.next_pattern);
        self.patterns.insert(id, triples);
        id
    }

    /// Elements tagged into `output` so far.
    pub fn structure(&self, output: NodeId) -> BTreeSet<NodeId> {
        self.structures.get(&output).cloned().unwrap_or_default()
    }

    /// Make every subsequent commit report a failed write.
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    pub fn search_count(&self) -> usize {
        self.searches.get()
    }

    pub fn commit_count(&self) -> usize {
        self.commits
    }

    fn pattern(&self, pattern: PatternId) -> Result<&[TriplePattern], StoreError> {
        self.patterns
            .get(&pattern)
            .map(Vec::as_slice)
            .ok_or(StoreError::UnknownPattern(pattern))
    }

    fn match_from(
        &self,
        triples: &[TriplePattern],
        bindings: Assignment,
        table: &mut Replacements,
    ) -> Result<(), BindingError> {
        let Some((first, rest)) = triples.split_first() else {
            if !table.contains_row(&bindings) {
                table.push_row(&bindings)?;
            }
            return Ok(());
        };

        for fact in &self.facts {
            let mut next = bindings.clone();
            if first.subject.unify(fact.subject, &mut next)
                && first.predicate.unify(fact.predicate, &mut next)
                && first.object.unify(fact.object, &mut next)
            {
                self.match_from(rest, next, table)?;
            }
        }
        Ok(())
    }
}

fn pattern_var_names(triples: &[TriplePattern]) -> BTreeSet<String> {
    triples
        .iter()
        .flat_map(|triple| triple.slots())
        .filter_map(|slot| match slot {
            Slot::Var(name) => Some(name.clone()),
            Slot::Node(_) => None,
        })
        .collect()
}

/// Restrict `assignment` to the variables the pattern mentions.
fn seed(names: &BTreeSet<String>, assignment: &Assignment) -> Assignment {
    assignment
        .iter()
        .filter(|(name, _)| names.contains(*name))
        .map(|(name, node)| (name.clone(), node))
        .collect()
}

impl PatternStore for MemoryStore {
    type Instance = MemoryInstance;

    fn search(
        &self,
        pattern: PatternId,
        assignment: &Assignment,
    ) -> Result<Replacements, StoreError> {
        let triples = self.pattern(pattern)?;
        self.searches.set(self.searches.get() + 1);

        let names = pattern_var_names(triples);
        let mut table = Replacements::new();
        self.match_from(triples, seed(&names, assignment), &mut table)?;
        Ok(table)
    }

    fn var_names(&self, pattern: PatternId) -> Result<BTreeSet<String>, StoreError> {
        Ok(pattern_var_names(self.pattern(pattern)?))
    }

    fn build_instance(
        &self,
        pattern: PatternId,
        assignment: &Assignment,
    ) -> Result<MemoryInstance, StoreError> {
        let triples = self.pattern(pattern)?;
        let bindings = seed(&pattern_var_names(triples), assignment);
        Ok(MemoryInstance {
            pattern,
            triples: triples.iter().map(|triple| triple.bind(&bindings)).collect(),
            bindings,
        })
    }

    fn commit_instance(&mut self, instance: MemoryInstance) -> Result<CommitOutcome, StoreError> {
        if self.reject_writes {
            return Ok(CommitOutcome::rejected());
        }

        let MemoryInstance {
            pattern,
            triples,
            mut bindings,
        } = instance;
        let mut produced = Vec::new();

        for name in pattern_var_names(&triples) {
            if !bindings.contains(&name) {
                let node = self.fresh_node();
                bindings.bind(name, node);
                produced.push(node);
            }
        }

        for triple in &triples {
            let mut resolved = [NodeId(0); 3];
            for (target, slot) in resolved.iter_mut().zip(triple.slots()) {
                *target = slot.resolve(&bindings).ok_or_else(|| StoreError::Unbound {
                    pattern,
                    name: match slot {
                        Slot::Var(name) => name.clone(),
                        Slot::Node(node) => node.to_string(),
                    },
                })?;
            }
            let [subject, predicate, object] = resolved;
            produced.push(self.insert_fact(subject, predicate, object));
        }

        self.commits += 1;
        Ok(CommitOutcome {
            committed: true,
            produced,
            bindings,
        })
    }

    fn mark_produced(&mut self, output: NodeId, element: NodeId) -> Result<(), StoreError> {
        if element.0 == 0 || element.0 > self.next_node {
            return Err(StoreError::UnknownElement(element));
        }
        self.structures.entry(output).or_default().insert(element);
        Ok(())
    }

    /// Each hint may ground any single variable of the pattern.
    fn create_assignments(
        &self,
        pattern: PatternId,
        hints: &[NodeId],
    ) -> Result<Vec<Assignment>, StoreError> {
        let names = self.var_names(pattern)?;
        if hints.is_empty() || names.is_empty() {
            return Ok(vec![Assignment::new()]);
        }

        let mut assignments = Vec::new();
        for hint in hints {
            for name in &names {
                let candidate = Assignment::new().with(name.clone(), *hint);
                if !assignments.contains(&candidate) {
                    assignments.push(candidate);
                }
            }
        }
        Ok(assignments)
    }
}
