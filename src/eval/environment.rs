//! # Environment
//!
//! Variable bindings supplied by the caller for one execution. The
//! engine borrows an environment per call and never retains it, so
//! callers stay free to mutate bindings between calls or keep separate
//! environments per thread.

use std::collections::HashMap;

use crate::eval::value::Value;

/// Named variable bindings visible to expressions.
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable, replacing any existing binding of the same
    /// name.
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut env = Environment::new();
        env.set_variable("name", Value::String("kangert".to_string()));
        assert_eq!(
            env.get_variable("name"),
            Some(&Value::String("kangert".to_string()))
        );
    }

    #[test]
    fn test_missing_variable_is_none() {
        let env = Environment::new();
        assert_eq!(env.get_variable("missing"), None);
    }

    #[test]
    fn test_rebinding_replaces() {
        let mut env = Environment::new();
        env.set_variable("n", Value::Integer(1));
        env.set_variable("n", Value::Integer(2));
        assert_eq!(env.get_variable("n"), Some(&Value::Integer(2)));
    }
}
