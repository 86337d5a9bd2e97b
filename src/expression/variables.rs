use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::expression::ParseError;

/// Always-defined system variables.
pub const ROOT: &str = "ROOT";
pub const CURRENT: &str = "CURRENT";

/// The set of variable names visible while parsing an expression.
#[derive(Debug, Clone)]
pub struct VariablesParseState {
    defined: HashSet<String>,
}

impl Default for VariablesParseState {
    fn default() -> Self {
        Self::new()
    }
}

impl VariablesParseState {
    pub fn new() -> Self {
        let mut defined = HashSet::new();
        defined.insert(ROOT.to_string());
        defined.insert(CURRENT.to_string());
        Self { defined }
    }

    pub fn define(&mut self, name: &str) {
        self.defined.insert(name.to_string());
    }

    pub fn ensure_defined(&self, name: &str) -> Result<(), ParseError> {
        if self.defined.contains(name) {
            Ok(())
        } else {
            Err(ParseError::UndefinedVariable {
                name: name.to_string(),
            })
        }
    }
}

/// Runtime variable bindings consulted during evaluation.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    bindings: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// ROOT and CURRENT resolve to the document under evaluation; unknown
    /// names resolve to Null, matching an unset binding.
    pub fn resolve(&self, name: &str, root: &Value) -> Value {
        match name {
            ROOT | CURRENT => root.clone(),
            _ => self.bindings.get(name).cloned().unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_variables_are_always_in_scope() {
        let scope = VariablesParseState::new();
        assert!(scope.ensure_defined(ROOT).is_ok());
        assert!(scope.ensure_defined(CURRENT).is_ok());
        assert!(matches!(
            scope.ensure_defined("item"),
            Err(ParseError::UndefinedVariable { name }) if name == "item"
        ));
    }

    #[test]
    fn user_variables_resolve_to_bound_values() {
        let mut scope = VariablesParseState::new();
        scope.define("item");
        assert!(scope.ensure_defined("item").is_ok());

        let mut vars = Variables::new();
        vars.bind("item", json!({"sku": 9}));
        let root = json!({"a": 1});
        assert_eq!(vars.resolve("item", &root), json!({"sku": 9}));
        assert_eq!(vars.resolve(ROOT, &root), root);
        assert_eq!(vars.resolve("unbound", &root), json!(null));
    }
}
