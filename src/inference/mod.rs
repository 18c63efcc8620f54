//! Inference components: the expression tree, the tier scheduler and the
//! target-directed driver built on them.

mod builder;
mod error;
mod expression;
mod output;
mod scheduler;
mod solution;
mod strategy;

pub use builder::StrategyBuilder;
pub use error::InferenceError;
pub use expression::{EvalContext, ExpressionNode, FormulaResult};
pub use output::OutputFormatter;
pub use scheduler::{ScanState, TierScheduler};
pub use solution::{SolutionNode, SolutionTree};
pub use strategy::{StrategyConfig, StrategyOutcome, TargetStrategy};
