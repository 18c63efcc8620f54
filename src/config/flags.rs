use std::collections::BTreeMap;

/// Stop generating a conclusion after its first new row.
pub const FLAG_GENERATE_ONLY_FIRST: &str = "generate_only_first";
/// Record each firing in the solution tree.
pub const FLAG_GENERATE_SOLUTION_TREE: &str = "generate_solution_tree";

/// Named boolean toggles.  Hosts that keep their settings as flags apply
/// them to a strategy through the builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: BTreeMap<String, bool>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.flags.insert(name.into(), enabled);
    }

    /// Unset flags read as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn enable(&mut self, name: impl Into<String>) {
        self.set(name, true);
    }

    pub fn disable(&mut self, name: impl Into<String>) {
        self.set(name, false);
    }

    /// Flags that were set explicitly, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }
}
