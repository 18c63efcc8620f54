use super::PatternId;
use crate::inference::ExpressionNode;
use std::fmt;

/// Identifier assigned to a rule when it enters the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// A formula the driver can fire.
///
/// The premise is computed against the store; when it holds, the
/// conclusion is generated under the premise's bindings.  A rule without a
/// premise generates its conclusion under one unconstrained row.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Set by [`super::RuleArena::insert`].
    pub id: Option<RuleId>,
    pub formula: PatternId,
    pub premise: Option<ExpressionNode>,
    pub conclusion: ExpressionNode,
}

impl Rule {
    pub fn new(formula: PatternId, conclusion: ExpressionNode) -> Self {
        Self {
            id: None,
            formula,
            premise: None,
            conclusion,
        }
    }

    /// `premise => conclusion`, identified by `formula`.
    pub fn implication(
        formula: PatternId,
        premise: ExpressionNode,
        conclusion: ExpressionNode,
    ) -> Self {
        Self {
            id: None,
            formula,
            premise: Some(premise),
            conclusion,
        }
    }
}
