//! Typed registry of the model's binary decision variables.

use std::collections::HashMap;
use std::fmt;

/// Structured identity of a decision variable.
///
/// Indices refer to positions in the eligible trail list the model was built
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableKey {
    /// `x_i`: trail `i` is selected.
    Selection(usize),
    /// `y_i_j`: trails `i` and `j` (with `i < j`) are both selected.
    Conflict(usize, usize),
}

impl fmt::Display for VariableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selection(i) => write!(f, "x_{i}"),
            Self::Conflict(i, j) => write!(f, "y_{i}_{j}"),
        }
    }
}

/// Dense column identifier, assigned in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    /// Zero-based column position.
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: VariableKey,
    name: String,
}

/// Bidirectional mapping between [`VariableKey`], [`VariableId`] and the
/// variable name written to the LP file.
///
/// # Examples
/// ```
/// use trailpick_core::{VariableKey, VariableRegistry};
///
/// let mut registry = VariableRegistry::default();
/// let x0 = registry.register(VariableKey::Selection(0));
/// let y = registry.register(VariableKey::Conflict(0, 1));
///
/// assert_eq!(registry.name(x0), Some("x_0"));
/// assert_eq!(registry.lookup("y_0_1"), Some(y));
/// assert_eq!(registry.key(y), Some(VariableKey::Conflict(0, 1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableRegistry {
    entries: Vec<Entry>,
    by_key: HashMap<VariableKey, VariableId>,
    by_name: HashMap<String, VariableId>,
}

impl VariableRegistry {
    /// Register `key`, returning its column. Registering twice is a no-op.
    pub fn register(&mut self, key: VariableKey) -> VariableId {
        if let Some(id) = self.by_key.get(&key) {
            return *id;
        }
        let id = VariableId(self.entries.len());
        let name = key.to_string();
        self.by_key.insert(key, id);
        self.by_name.insert(name.clone(), id);
        self.entries.push(Entry { key, name });
        id
    }

    /// Column for `key`, if registered.
    pub fn id(&self, key: VariableKey) -> Option<VariableId> {
        self.by_key.get(&key).copied()
    }

    /// Column for a variable name as written in the model.
    pub fn lookup(&self, name: &str) -> Option<VariableId> {
        self.by_name.get(name).copied()
    }

    /// Structured key of a column.
    pub fn key(&self, id: VariableId) -> Option<VariableKey> {
        self.entries.get(id.0).map(|entry| entry.key)
    }

    /// Name of a column as written in the model.
    pub fn name(&self, id: VariableId) -> Option<&str> {
        self.entries.get(id.0).map(|entry| entry.name.as_str())
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether no variables are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(id, key, name)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, VariableKey, &str)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (VariableId(index), entry.key, entry.name.as_str()))
    }
}
