use crate::canonical::canonicalize;
use crate::digest::hash8;
use std::collections::{HashMap, HashSet};

/// Identity tuple deciding whether two like-named values are the same entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub name: String,
    pub payload: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// Memoizing, append-only key assignment for one namespace.
///
/// One instance per namespace and per run. Assignment depends on call order,
/// so callers must feed identities in a fixed order.
#[derive(Debug, Default)]
pub struct KeyGenerator {
    namespace: String,
    seen: HashMap<Identity, String>,
    assigned: HashSet<String>,
}

impl KeyGenerator {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            seen: HashMap::new(),
            assigned: HashSet::new(),
        }
    }

    /// Key for `(name, payload)`, assigning one on first sight
    pub fn generate(&mut self, name: &str, payload: &str) -> String {
        let identity = Identity::new(name, payload);
        if let Some(key) = self.seen.get(&identity) {
            return key.clone();
        }

        let base = canonicalize(name);
        let key = if self.assigned.contains(&base) {
            let suffixed = format!("{base}_{}", hash8(payload));
            log::debug!(
                "{}: {name:?} collides with an existing identity, assigned {suffixed}",
                self.namespace
            );
            suffixed
        } else {
            base
        };

        self.assigned.insert(key.clone());
        self.seen.insert(identity, key.clone());
        key
    }

    /// Number of distinct identities seen
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
