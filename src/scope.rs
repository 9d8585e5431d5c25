use crate::symbols::VariableSymbol;
use std::collections::HashMap;

/// One layer of name resolution. Lookups walk outward through `parent`;
/// declarations only ever touch the innermost layer.
#[derive(Debug, Clone, Default)]
pub struct BoundScope {
    variables: HashMap<String, VariableSymbol>,
    parent: Option<Box<BoundScope>>,
}

impl BoundScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: BoundScope) -> Self {
        Self {
            variables: HashMap::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Declares `variable` in this layer. Returns `false`, leaving the scope
    /// untouched, if the name already exists here.
    pub fn try_declare(&mut self, variable: VariableSymbol) -> bool {
        if self.variables.contains_key(&variable.name) {
            return false;
        }
        self.variables.insert(variable.name.clone(), variable);
        true
    }

    pub fn try_lookup(&self, name: &str) -> Option<&VariableSymbol> {
        if let Some(variable) = self.variables.get(name) {
            Some(variable)
        } else if let Some(ref parent) = self.parent {
            parent.try_lookup(name)
        } else {
            None
        }
    }

    /// Symbols declared in this layer only, in declaration order.
    pub fn declared_variables(&self) -> Vec<VariableSymbol> {
        let mut variables: Vec<_> = self.variables.values().cloned().collect();
        variables.sort_by_key(|v| v.id());
        variables
    }

    /// Detaches and returns the enclosing scope.
    pub fn take_parent(&mut self) -> Option<BoundScope> {
        self.parent.take().map(|parent| *parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    #[test]
    fn declare_fails_only_in_same_layer() {
        let mut outer = BoundScope::new();
        assert!(outer.try_declare(VariableSymbol::new("x", false, ValueType::Int)));
        assert!(!outer.try_declare(VariableSymbol::new("x", true, ValueType::Bool)));
        assert_eq!(outer.declared_variables().len(), 1);

        let mut inner = BoundScope::with_parent(outer);
        assert!(inner.try_declare(VariableSymbol::new("x", false, ValueType::Float)));
        assert_eq!(
            inner.try_lookup("x").map(|v| v.value_type),
            Some(ValueType::Float)
        );

        let outer = inner.take_parent();
        assert_eq!(
            outer.and_then(|s| s.try_lookup("x").map(|v| v.value_type)),
            Some(ValueType::Int)
        );
    }
}
