//! Text rendering of an episode: outcome, derivation log and counters.

use crate::config::Statistics;
use crate::inference::{SolutionTree, StrategyConfig, StrategyOutcome};
use std::fmt::{self, Write};

/// Accumulates a plain-text report of an inference episode.
pub struct OutputFormatter {
    output: String,
}

impl OutputFormatter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Get the formatted output.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    pub fn write_banner(&mut self) -> fmt::Result {
        writeln!(
            &mut self.output,
            "----- forward-infer {} -----",
            env!("CARGO_PKG_VERSION")
        )
    }

    /// Settings that differ from the defaults.
    pub fn write_config(&mut self, config: &StrategyConfig) -> fmt::Result {
        let defaults = StrategyConfig::default();
        if config.generate_only_first != defaults.generate_only_first {
            writeln!(
                &mut self.output,
                "set(generate_only_first, {}).",
                config.generate_only_first
            )?;
        }
        if config.generate_solution_tree != defaults.generate_solution_tree {
            writeln!(
                &mut self.output,
                "set(generate_solution_tree, {}).",
                config.generate_solution_tree
            )?;
        }
        if let Some(limit) = config.max_firings {
            writeln!(&mut self.output, "assign(max_firings, {}).", limit)?;
        }
        Ok(())
    }

    pub fn write_solution_tree(&mut self, tree: &SolutionTree) -> fmt::Result {
        writeln!(&mut self.output)?;
        writeln!(&mut self.output, "----------- derivation ----------------")?;
        for (step, node) in tree.iter().enumerate() {
            writeln!(
                &mut self.output,
                "{}. {} over {{{}}}",
                step + 1,
                node.formula,
                node.variable_names
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            for row in &node.bindings {
                writeln!(&mut self.output, "     {}", row)?;
            }
        }
        Ok(())
    }

    pub fn write_outcome(&mut self, outcome: &StrategyOutcome) -> fmt::Result {
        writeln!(&mut self.output)?;
        writeln!(&mut self.output, "============ end of search ============")?;
        writeln!(&mut self.output)?;
        match outcome {
            StrategyOutcome::AlreadyAchieved => {
                writeln!(&mut self.output, "Target already held; nothing generated.")
            }
            StrategyOutcome::Achieved { firings } => writeln!(
                &mut self.output,
                "Target reached after {} firings.",
                firings
            ),
            StrategyOutcome::Exhausted { firings } => writeln!(
                &mut self.output,
                "Search stopped because all rule sets are exhausted ({} firings).",
                firings
            ),
            StrategyOutcome::ResourceLimit { firings } => writeln!(
                &mut self.output,
                "Search stopped by max_firings limit ({} firings).",
                firings
            ),
        }
    }

    pub fn write_statistics(&mut self, stats: &Statistics) -> fmt::Result {
        writeln!(&mut self.output)?;
        writeln!(&mut self.output, "-------------- statistics -------------")?;
        for (name, value) in stats.iter() {
            writeln!(&mut self.output, "{:<26} {:>8}", name, value)?;
        }
        Ok(())
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}
