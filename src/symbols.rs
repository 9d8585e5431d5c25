use crate::value::{Value, ValueType};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_SYMBOL_ID: AtomicUsize = AtomicUsize::new(0);

/// A declared variable. Two declarations of the same name (shadowing, or a
/// later REPL submission) are distinct symbols with distinct storage.
#[derive(Debug, Clone)]
pub struct VariableSymbol {
    id: usize,
    pub name: String,
    pub is_read_only: bool,
    pub value_type: ValueType,
}

impl VariableSymbol {
    pub fn new(name: impl Into<String>, is_read_only: bool, value_type: ValueType) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            is_read_only,
            value_type,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

impl PartialEq for VariableSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VariableSymbol {}

impl Hash for VariableSymbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for VariableSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Runtime storage shared across a session, keyed by symbol identity.
pub type VariableStore = HashMap<VariableSymbol, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_different_identity() {
        let outer = VariableSymbol::new("x", false, ValueType::Int);
        let inner = VariableSymbol::new("x", false, ValueType::Int);
        assert_ne!(outer, inner);
        assert_eq!(outer, outer.clone());

        let mut store = VariableStore::new();
        store.insert(outer.clone(), Value::Int(1));
        store.insert(inner, Value::Int(2));
        assert_eq!(store.get(&outer), Some(&Value::Int(1)));
        assert_eq!(store.len(), 2);
    }
}
