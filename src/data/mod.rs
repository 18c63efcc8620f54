//! Value types shared by the evaluator and the driver.
//!
//! Node and pattern handles belong to the host store and are only referenced
//! here; everything else lives for one inference episode.

pub mod assignment;
pub mod containers;
pub mod list;
pub mod node;
pub mod replacements;
pub mod rule;
pub mod rule_store;

pub use assignment::Assignment;
pub use list::RuleQueue;
pub use node::{NodeId, PatternId};
pub use replacements::{BindingError, Replacements};
pub use rule::{Rule, RuleId};
pub use rule_store::RuleArena;
