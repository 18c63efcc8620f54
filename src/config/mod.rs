//! Episode settings and counters.
//!
//! Settings are plain values built in memory; nothing here reads files or
//! the environment.

mod flags;
mod stats;

pub use flags::{FlagSet, FLAG_GENERATE_ONLY_FIRST, FLAG_GENERATE_SOLUTION_TREE};
pub use stats::{
    Statistics, STAT_RESTARTS, STAT_ROWS_GENERATED, STAT_RULES_FIRED, STAT_RULES_TRIED,
    STAT_TARGET_CHECKS,
};
