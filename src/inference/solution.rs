//! Record of the rule firings that led to an inference outcome.

use crate::data::{Assignment, PatternId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One successful firing: the rule formula and the bindings it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionNode {
    pub formula: PatternId,
    pub bindings: Vec<Assignment>,
    pub variable_names: BTreeSet<String>,
}

/// Firings in the order they happened.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionTree {
    nodes: Vec<SolutionNode>,
}

impl SolutionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        formula: PatternId,
        bindings: Vec<Assignment>,
        variable_names: BTreeSet<String>,
    ) {
        self.nodes.push(SolutionNode {
            formula,
            bindings,
            variable_names,
        });
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SolutionNode> {
        self.nodes.iter()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::SolutionTree;
    use crate::data::{Assignment, NodeId, PatternId};
    use std::collections::BTreeSet;

    #[test]
    fn nodes_keep_firing_order() {
        let mut tree = SolutionTree::new();
        assert!(tree.is_empty());

        let names: BTreeSet<String> = ["x".to_string()].into_iter().collect();
        tree.add_node(
            PatternId(7),
            vec![Assignment::new().with("x", NodeId(1))],
            names.clone(),
        );
        tree.add_node(PatternId(3), Vec::new(), BTreeSet::new());

        let formulas: Vec<_> = tree.iter().map(|node| node.formula).collect();
        assert_eq!(formulas, vec![PatternId(7), PatternId(3)]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn serializes_to_json() {
        let mut tree = SolutionTree::new();
        tree.add_node(
            PatternId(2),
            vec![Assignment::new().with("x", NodeId(5))],
            ["x".to_string()].into_iter().collect(),
        );

        let json = tree.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"][0]["formula"], 2);
        assert_eq!(value["nodes"][0]["variable_names"][0], "x");
        assert_eq!(value["nodes"][0]["bindings"][0]["bindings"]["x"], 5);
    }
}
