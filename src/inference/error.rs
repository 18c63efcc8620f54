use crate::data::{BindingError, PatternId, RuleId};
use crate::store::StoreError;
use thiserror::Error;

/// Errors that end an inference episode.
///
/// An empty search result is never an error; it is the ordinary "false".
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The driver was given no priority tiers.
    #[error("no rule sets found")]
    NoRuleSets,
    /// Neither the store nor the input row bound a variable during generation.
    #[error("generation of {pattern} has no value for variable `{name}`")]
    UnresolvedVariable { pattern: PatternId, name: String },
    #[error("unknown rule {0}")]
    UnknownRule(RuleId),
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
