//! # Values
//!
//! Runtime values produced by evaluation and the stringification rules
//! used when results splice back into the output text.
//!
//! Stringification is part of the observable contract:
//! - strings render bare, without quotes
//! - integers render without a decimal point
//! - floats always carry a decimal point, so `4.0` renders as `"4.0"`
//! - `Null` renders as `"null"` when displayed directly, though the
//!   engine drops null results from assembled output entirely

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::eval::host::{HostObject, ParamType};

/// A runtime value.
///
/// `Object` holds a shared handle to caller-supplied host
/// functionality; everything else is plain data.
#[derive(Debug, Clone, Default)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    Object(Arc<dyn HostObject>),
    #[default]
    Null,
}

impl Value {
    /// Human-readable type name used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(object) => object.type_name(),
            Value::Null => "null",
        }
    }

    /// The parameter type this value satisfies exactly, or `None` for
    /// `Null`, which matches only `Any` parameters.
    pub fn type_tag(&self) -> Option<ParamType> {
        match self {
            Value::Integer(_) => Some(ParamType::Integer),
            Value::Float(_) => Some(ParamType::Float),
            Value::String(_) => Some(ParamType::String),
            Value::List(_) => Some(ParamType::List),
            Value::Map(_) => Some(ParamType::Map),
            Value::Object(_) => Some(ParamType::Object),
            Value::Null => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Host objects compare by identity, not contents
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    write!(f, "{:.1}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            Value::String(value) => write!(f, "{}", value),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Object(object) => write!(f, "{}", object.type_name()),
            Value::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::host::MethodRegistry;

    #[test]
    fn test_default_is_null() {
        assert_eq!(Value::default(), Value::Null);
    }

    #[test]
    fn test_display_integer_has_no_decimal() {
        assert_eq!(Value::Integer(4).to_string(), "4");
        assert_eq!(Value::Integer(-17).to_string(), "-17");
    }

    #[test]
    fn test_display_float_always_has_decimal() {
        assert_eq!(Value::Float(4.0).to_string(), "4.0");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::Float(-2.0).to_string(), "-2.0");
    }

    #[test]
    fn test_display_string_is_bare() {
        assert_eq!(Value::String("kangert".to_string()).to_string(), "kangert");
    }

    #[test]
    fn test_display_null() {
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_display_list() {
        let list = Value::List(vec![
            Value::Integer(1),
            Value::String("a".to_string()),
            Value::Null,
        ]);
        assert_eq!(list.to_string(), "[1, a, null]");
    }

    #[test]
    fn test_display_map() {
        let mut entries = HashMap::new();
        entries.insert("a".to_string(), Value::Integer(1));
        let map = Value::Map(entries);
        assert_eq!(map.to_string(), "{a: 1}");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Integer(1).type_name(), "integer");
        assert_eq!(Value::Float(1.0).type_name(), "float");
        assert_eq!(Value::Null.type_name(), "null");
        let object = Value::Object(Arc::new(MethodRegistry::new("StrUtil")));
        assert_eq!(object.type_name(), "StrUtil");
    }

    #[test]
    fn test_object_equality_is_identity() {
        let registry = Arc::new(MethodRegistry::new("StrUtil"));
        let a = Value::Object(registry.clone());
        let b = Value::Object(registry);
        let c = Value::Object(Arc::new(MethodRegistry::new("StrUtil")));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
