//! Capabilities the inference core consumes from the host graph store.
//!
//! The core never touches storage directly: searching, instantiating and
//! writing patterns all go through [`PatternStore`].  [`memory::MemoryStore`]
//! is a small in-memory adapter used by the tests.

pub mod memory;

use crate::data::{Assignment, BindingError, NodeId, PatternId, Replacements};
use std::collections::BTreeSet;
use thiserror::Error;

pub use memory::{MemoryInstance, MemoryStore, Slot, TriplePattern};

/// Structural faults reported by a store adapter.
///
/// A write that simply did not happen is not a fault; see
/// [`CommitOutcome::committed`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown pattern {0}")]
    UnknownPattern(PatternId),
    #[error("unknown element {0}")]
    UnknownElement(NodeId),
    #[error("instance of {pattern} leaves variable `{name}` unbound")]
    Unbound { pattern: PatternId, name: String },
    #[error("malformed search result: {0}")]
    Binding(#[from] BindingError),
}

/// Result of writing a prepared instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Whether the instance was written.
    pub committed: bool,
    /// Elements created by the write.
    pub produced: Vec<NodeId>,
    /// Variable values resolved by the store during the write.
    pub bindings: Assignment,
}

impl CommitOutcome {
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// Gateway into the host graph store.
///
/// Searches return tables whose columns are the pattern's variables.
/// Assignment entries for names the pattern does not mention are ignored.
pub trait PatternStore {
    /// Concrete sub-graph prepared by [`PatternStore::build_instance`].
    type Instance;

    /// All matches of `pattern` consistent with `assignment`.
    fn search(
        &self,
        pattern: PatternId,
        assignment: &Assignment,
    ) -> Result<Replacements, StoreError>;

    /// Row-deduplicated union of [`PatternStore::search`] over `assignments`.
    fn search_all(
        &self,
        pattern: PatternId,
        assignments: &[Assignment],
    ) -> Result<Replacements, StoreError> {
        let mut result = Replacements::new();
        for assignment in assignments {
            let found = self.search(pattern, assignment)?;
            result.merge_distinct(&found)?;
        }
        Ok(result)
    }

    /// Free variable names of `pattern`.
    fn var_names(&self, pattern: PatternId) -> Result<BTreeSet<String>, StoreError>;

    /// Prepare a concrete instance of `pattern` without writing it.
    fn build_instance(
        &self,
        pattern: PatternId,
        assignment: &Assignment,
    ) -> Result<Self::Instance, StoreError>;

    /// Write a prepared instance.
    fn commit_instance(&mut self, instance: Self::Instance) -> Result<CommitOutcome, StoreError>;

    /// Tag `element` as part of the episode's output structure.
    fn mark_produced(&mut self, output: NodeId, element: NodeId) -> Result<(), StoreError>;

    /// Candidate groundings of `pattern` built from argument hints.
    ///
    /// Empty hints, or a pattern without variables, must yield a single
    /// unconstrained assignment.
    fn create_assignments(
        &self,
        pattern: PatternId,
        hints: &[NodeId],
    ) -> Result<Vec<Assignment>, StoreError>;
}
