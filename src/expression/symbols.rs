//! Symbol tables consulted by the expression evaluator.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only mapping from lowercase parameter name to value.
///
/// The evaluator folds identifiers to lowercase before calling
/// [`Symbols::lookup`].
pub trait Symbols {
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Symbols for HashMap<String, f64, S> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Symbols for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<T: Symbols + ?Sized> Symbols for &T {
    fn lookup(&self, name: &str) -> Option<f64> {
        (**self).lookup(name)
    }
}

/// Case-insensitive parameter table with optional parent scope.
///
/// Lookups try this scope first and then the parent chain, so a subcircuit
/// scope shadows the global one.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable<'p> {
    values: HashMap<String, f64>,
    parent: Option<&'p ParameterTable<'p>>,
}

impl<'p> ParameterTable<'p> {
    /// Create an empty top-level table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scope whose lookups fall back to `self`.
    pub fn child(&self) -> ParameterTable<'_> {
        ParameterTable {
            values: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Define or overwrite a parameter in this scope.
    pub fn insert(&mut self, name: &str, value: f64) -> Option<f64> {
        self.values.insert(name.to_lowercase(), value)
    }

    /// Look up a parameter by name (case-insensitive), including parents.
    pub fn get(&self, name: &str) -> Option<f64> {
        let folded = name.to_lowercase();
        self.lookup_folded(&folded)
    }

    fn lookup_folded(&self, name: &str) -> Option<f64> {
        self.values
            .get(name)
            .copied()
            .or_else(|| self.parent.and_then(|p| p.lookup_folded(name)))
    }

    /// Whether this scope (not its parents) defines `name`.
    pub fn defines(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_lowercase())
    }

    /// Number of parameters defined in this scope.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All visible parameters, inner scopes winning, sorted by name.
    pub fn merged(&self) -> BTreeMap<String, f64> {
        let mut result = self.parent.map(|p| p.merged()).unwrap_or_default();
        for (name, value) in &self.values {
            result.insert(name.clone(), *value);
        }
        result
    }
}

impl Symbols for ParameterTable<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

impl<'p> FromIterator<(String, f64)> for ParameterTable<'p> {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut table = ParameterTable::new();
        for (name, value) in iter {
            table.insert(&name, value);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        let mut table = ParameterTable::new();
        table.insert("Rload", 1e3);
        assert_eq!(table.get("RLOAD"), Some(1e3));
        assert_eq!(table.lookup("rload"), Some(1e3));
        assert!(table.defines("rLoad"));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn test_child_scope_shadows_parent() {
        let mut global = ParameterTable::new();
        global.insert("w", 1.0);
        global.insert("l", 2.0);

        let mut local = global.child();
        local.insert("w", 10.0);

        assert_eq!(local.get("w"), Some(10.0));
        assert_eq!(local.get("l"), Some(2.0));
        assert_eq!(global.get("w"), Some(1.0));
        assert_eq!(local.len(), 1);

        let merged = local.merged();
        assert_eq!(merged.get("w"), Some(&10.0));
        assert_eq!(merged.get("l"), Some(&2.0));
    }

    #[test]
    fn test_std_maps() {
        let map: HashMap<String, f64> = [("x".to_string(), 3.0)].into_iter().collect();
        assert_eq!(map.lookup("x"), Some(3.0));
        let tree: BTreeMap<String, f64> = [("y".to_string(), 4.0)].into_iter().collect();
        assert_eq!((&tree).lookup("y"), Some(4.0));
    }
}
