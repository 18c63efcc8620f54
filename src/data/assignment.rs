use super::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Variable assignment used to instantiate a pattern for search or writing.
///
/// Names absent from the pattern being instantiated are ignored by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    bindings: BTreeMap<String, NodeId>,
}

impl Assignment {
    /// Create an empty (unconstrained) assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding, handy when assembling search constraints.
    pub fn with(mut self, name: impl Into<String>, node: NodeId) -> Self {
        self.bind(name, node);
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, node: NodeId) {
        self.bindings.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.bindings.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.bindings.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, NodeId)> {
        self.bindings.iter().map(|(name, node)| (name, *node))
    }

    /// True when every variable bound on both sides has the same value.
    pub fn agrees_with(&self, other: &Assignment) -> bool {
        self.bindings
            .iter()
            .all(|(name, node)| other.get(name).map_or(true, |value| value == *node))
    }

    /// Union of both assignments; `other` wins on conflicting names.
    pub fn merged(&self, other: &Assignment) -> Assignment {
        let mut result = self.clone();
        for (name, node) in other.iter() {
            result.bind(name.clone(), node);
        }
        result
    }
}

impl FromIterator<(String, NodeId)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (String, NodeId)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, (name, node)) in self.bindings.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", name, node)?;
        }
        write!(f, "}}")
    }
}
