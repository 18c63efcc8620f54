//! Forward-chaining inference over graph pattern templates.
//!
//! Rules are boolean formulas over stored sub-graph patterns.  The driver
//! fires them in priority tiers, writing missing facts through a
//! [`PatternStore`] until a target pattern matches or no rule makes progress.
//! The store itself is supplied by the host; [`store::MemoryStore`] is a small
//! in-memory adapter.

pub mod config;
pub mod data;
pub mod inference;
pub mod store;

pub use config::{FlagSet, Statistics};
pub use data::{
    Assignment, BindingError, NodeId, PatternId, Replacements, Rule, RuleArena, RuleId,
    RuleQueue,
};
pub use inference::{
    EvalContext, ExpressionNode, FormulaResult, InferenceError, OutputFormatter, ScanState,
    SolutionNode, SolutionTree, StrategyBuilder, StrategyConfig, StrategyOutcome,
    TargetStrategy, TierScheduler,
};
pub use store::{CommitOutcome, MemoryStore, PatternStore, StoreError};
