//! Logical expression tree evaluated against the pattern store.
//!
//! Atomic nodes talk to the store; `And`, `Or` and `Not` combine the binding
//! tables of their children.  Four operations are defined on every node:
//!
//! * `check` decides truth under one assignment, without writing.
//! * `compute` discovers bindings from the episode's argument hints.
//! * `find` restricts the search to rows established elsewhere, which is how
//!   a conjunction propagates bindings from earlier conjuncts to later ones.
//! * `generate` writes missing facts, never re-deriving one that holds.

use crate::data::containers::{intersect_all, unite_sets};
use crate::data::{Assignment, NodeId, PatternId, Replacements};
use crate::inference::InferenceError;
use crate::store::PatternStore;
use log::{debug, trace, warn};
use std::collections::BTreeSet;

/// Outcome of evaluating an expression node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormulaResult {
    /// Whether the formula is satisfied.
    pub value: bool,
    /// Whether new facts were written while evaluating it.
    pub is_generated: bool,
    /// Bindings supporting the value.
    pub replacements: Replacements,
    /// Pattern of the atomic node that produced the result, if any.
    pub pattern: Option<PatternId>,
}

impl FormulaResult {
    fn from_table(pattern: Option<PatternId>, replacements: Replacements) -> Self {
        Self {
            value: !replacements.is_empty(),
            is_generated: false,
            replacements,
            pattern,
        }
    }

    fn falsity(is_generated: bool) -> Self {
        Self {
            is_generated,
            ..Self::default()
        }
    }
}

/// Capabilities a generation pass needs for one episode.
pub struct EvalContext<'a, S: PatternStore + ?Sized> {
    pub store: &'a mut S,
    /// Structure that collects every element written during the episode.
    pub output: NodeId,
    /// Argument hints used whenever there are no candidate rows.
    pub arguments: &'a [NodeId],
    /// Stop after the first row that produces a new fact.
    pub generate_only_first: bool,
}

impl<'a, S: PatternStore + ?Sized> EvalContext<'a, S> {
    pub fn new(store: &'a mut S, output: NodeId) -> Self {
        Self {
            store,
            output,
            arguments: &[],
            generate_only_first: false,
        }
    }

    pub fn with_arguments(mut self, arguments: &'a [NodeId]) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn generate_only_first(mut self, enabled: bool) -> Self {
        self.generate_only_first = enabled;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpressionNode {
    Atomic(PatternId),
    And(Vec<ExpressionNode>),
    Or(Vec<ExpressionNode>),
    Not(Box<ExpressionNode>),
}

impl ExpressionNode {
    pub fn atomic(pattern: PatternId) -> Self {
        ExpressionNode::Atomic(pattern)
    }

    pub fn and(children: Vec<ExpressionNode>) -> Self {
        ExpressionNode::And(children)
    }

    pub fn or(children: Vec<ExpressionNode>) -> Self {
        ExpressionNode::Or(children)
    }

    pub fn not(child: ExpressionNode) -> Self {
        ExpressionNode::Not(Box::new(child))
    }

    /// Truth of the formula under `assignment`.  Never writes.
    pub fn check<S>(&self, store: &S, assignment: &Assignment) -> Result<bool, InferenceError>
    where
        S: PatternStore + ?Sized,
    {
        match self {
            ExpressionNode::Atomic(pattern) => {
                let found = store.search(*pattern, assignment)?;
                trace!("Atomic logical formula {} {}", pattern, !found.is_empty());
                Ok(!found.is_empty())
            }
            ExpressionNode::And(children) => {
                for child in children {
                    if !child.check(store, assignment)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ExpressionNode::Or(children) => {
                for child in children {
                    if child.check(store, assignment)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ExpressionNode::Not(child) => Ok(!child.check(store, assignment)?),
        }
    }

    /// Truth and bindings, searched from the argument hints.
    ///
    /// Empty hints search without constraints.
    pub fn compute<S>(&self, store: &S, hints: &[NodeId]) -> Result<FormulaResult, InferenceError>
    where
        S: PatternStore + ?Sized,
    {
        match self {
            ExpressionNode::Atomic(pattern) => compute_atomic(*pattern, store, hints),
            ExpressionNode::And(children) => {
                let mut acc = Replacements::new();
                for child in children {
                    let result = if acc.is_empty() {
                        child.compute(store, hints)?
                    } else {
                        child.find(store, &acc)?
                    };
                    if !result.value || !conjoin(&mut acc, result.replacements) {
                        return Ok(FormulaResult::falsity(false));
                    }
                }
                Ok(conjunction_result(acc))
            }
            ExpressionNode::Or(children) => {
                let mut value = false;
                let mut tables = Vec::new();
                for child in children {
                    let result = child.compute(store, hints)?;
                    if result.value {
                        value = true;
                        tables.push(result.replacements);
                    }
                }
                disjunction_result(value, &tables)
            }
            ExpressionNode::Not(child) => {
                let result = child.compute(store, hints)?;
                Ok(FormulaResult {
                    value: !result.value,
                    ..FormulaResult::default()
                })
            }
        }
    }

    /// Truth and bindings restricted to the candidate `rows`.
    pub fn find<S>(&self, store: &S, rows: &Replacements) -> Result<FormulaResult, InferenceError>
    where
        S: PatternStore + ?Sized,
    {
        match self {
            ExpressionNode::Atomic(pattern) => {
                let found = store.search_all(*pattern, &rows.to_assignments())?;
                let result = FormulaResult::from_table(Some(*pattern), found);
                debug!("Find statement {} {}", pattern, result.value);
                Ok(result)
            }
            ExpressionNode::And(children) => {
                let mut acc = rows.clone();
                for child in children {
                    let result = child.find(store, &acc)?;
                    if !result.value || !conjoin(&mut acc, result.replacements) {
                        return Ok(FormulaResult::falsity(false));
                    }
                }
                Ok(conjunction_result(acc))
            }
            ExpressionNode::Or(children) => {
                let mut value = false;
                let mut tables = Vec::new();
                for child in children {
                    let result = child.find(store, rows)?;
                    if result.value {
                        value = true;
                        tables.push(result.replacements);
                    }
                }
                disjunction_result(value, &tables)
            }
            ExpressionNode::Not(child) => {
                let mut kept = Replacements::new();
                for row in rows.to_assignments() {
                    if !child.check(store, &row)? {
                        kept.push_row(&row)?;
                    }
                }
                Ok(FormulaResult::from_table(None, kept))
            }
        }
    }

    /// Write the facts needed for the formula to hold under `rows`.
    ///
    /// Only atomic nodes write.  `And` generates its children in order,
    /// `Or` generates through the first child that can be made true, and
    /// `Not` only evaluates.
    pub fn generate<S>(
        &self,
        ctx: &mut EvalContext<'_, S>,
        rows: &Replacements,
    ) -> Result<FormulaResult, InferenceError>
    where
        S: PatternStore + ?Sized,
    {
        match self {
            ExpressionNode::Atomic(pattern) => generate_atomic(*pattern, ctx, rows),
            ExpressionNode::And(children) => {
                let mut acc = rows.clone();
                let mut generated = false;
                for child in children {
                    let result = child.generate(ctx, &acc)?;
                    generated |= result.is_generated;
                    if !result.value {
                        return Ok(FormulaResult::falsity(generated));
                    }
                    // Re-read the child so later conjuncts see rows that held
                    // before this pass as well as the freshly written ones.
                    let found = if acc.is_empty() {
                        result.replacements
                    } else {
                        child.find(&*ctx.store, &acc)?.replacements
                    };
                    if !conjoin(&mut acc, found) {
                        return Ok(FormulaResult::falsity(generated));
                    }
                }
                Ok(FormulaResult {
                    value: true,
                    is_generated: generated,
                    replacements: acc,
                    pattern: None,
                })
            }
            ExpressionNode::Or(children) => {
                // Writes by children that end up false still count.
                let mut generated = false;
                for child in children {
                    let mut result = child.generate(ctx, rows)?;
                    generated |= result.is_generated;
                    if result.value {
                        result.is_generated = generated;
                        return Ok(result);
                    }
                }
                Ok(FormulaResult::falsity(generated))
            }
            ExpressionNode::Not(_) => {
                if rows.is_empty() {
                    self.compute(&*ctx.store, ctx.arguments)
                } else {
                    self.find(&*ctx.store, rows)
                }
            }
        }
    }
}

fn compute_atomic<S>(
    pattern: PatternId,
    store: &S,
    hints: &[NodeId],
) -> Result<FormulaResult, InferenceError>
where
    S: PatternStore + ?Sized,
{
    let replacements = if hints.is_empty() {
        store.search(pattern, &Assignment::new())?
    } else {
        let assignments = store.create_assignments(pattern, hints)?;
        store.search_all(pattern, &assignments)?
    };
    let result = FormulaResult::from_table(Some(pattern), replacements);
    debug!("Compute atomic logical formula {} {}", pattern, result.value);
    Ok(result)
}

fn generate_atomic<S>(
    pattern: PatternId,
    ctx: &mut EvalContext<'_, S>,
    rows: &Replacements,
) -> Result<FormulaResult, InferenceError>
where
    S: PatternStore + ?Sized,
{
    let assignments = rows.to_assignments();
    if assignments.is_empty() {
        debug!("Atomic logical formula {} is not generated: no candidate rows", pattern);
        return compute_atomic(pattern, &*ctx.store, ctx.arguments);
    }

    let names = unite_sets(&rows.key_names(), &ctx.store.var_names(pattern)?);
    let mut result = FormulaResult {
        pattern: Some(pattern),
        ..FormulaResult::default()
    };
    let mut count = 0;

    for assignment in &assignments {
        if ctx.generate_only_first && result.is_generated {
            break;
        }

        if !ctx.store.search(pattern, assignment)?.is_empty() {
            trace!("{} already holds for {}", pattern, assignment);
            result.value = true;
            continue;
        }

        let instance = ctx.store.build_instance(pattern, assignment)?;
        let outcome = ctx.store.commit_instance(instance)?;
        if outcome.committed {
            count += 1;
            result.is_generated = true;
            result.value = true;

            let mut row = Assignment::new();
            for name in &names {
                let node = outcome
                    .bindings
                    .get(name)
                    .or_else(|| assignment.get(name))
                    .ok_or_else(|| InferenceError::UnresolvedVariable {
                        pattern,
                        name: name.clone(),
                    })?;
                row.bind(name.clone(), node);
            }
            let single = Replacements::from_assignments([&row])?;
            result.replacements = result.replacements.unite(&single)?;
        } else {
            warn!("Store did not write {} for {}", pattern, assignment);
        }

        for element in outcome.produced {
            ctx.store.mark_produced(ctx.output, element)?;
        }
    }

    debug!("Atomic logical formula {} is generated {} times", pattern, count);
    Ok(result)
}

/// Join a conjunct's table into the accumulated rows.
///
/// An empty accumulator means no bindings yet.  A conjunct that holds
/// without rows (a negation) leaves the rows as they are.  Returns `false`
/// when the join leaves no consistent row.
fn conjoin(acc: &mut Replacements, table: Replacements) -> bool {
    if table.is_empty() {
        return true;
    }
    *acc = if acc.is_empty() { table } else { acc.join(&table) };
    !acc.is_empty()
}

fn conjunction_result(rows: Replacements) -> FormulaResult {
    FormulaResult {
        value: true,
        is_generated: false,
        replacements: rows,
        pattern: None,
    }
}

/// Rows of every true disjunct, projected onto their common variables.
fn disjunction_result(
    value: bool,
    tables: &[Replacements],
) -> Result<FormulaResult, InferenceError> {
    let tables: Vec<&Replacements> = tables.iter().filter(|t| !t.is_empty()).collect();
    let key_sets: Vec<BTreeSet<String>> = tables.iter().map(|t| t.key_names()).collect();
    let common = intersect_all(&key_sets).unwrap_or_default();

    let mut replacements = Replacements::new();
    for table in tables {
        replacements.merge_distinct(&table.project(&common))?;
    }
    Ok(FormulaResult {
        value,
        is_generated: false,
        replacements,
        pattern: None,
    })
}
