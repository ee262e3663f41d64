//! # Host methods
//!
//! The surface through which callers expose native functionality to
//! expressions. A [`HostObject`] is bound into the environment as a
//! regular variable; method calls on it dispatch by name and argument
//! types against the overloads the object reports.
//!
//! ## Overload selection
//!
//! Candidates are filtered to the call's arity, then an exact signature
//! match wins; failing that, the first signature reachable through
//! compatibility rules is taken: `Any` accepts every value including
//! null, and a `Float` parameter accepts an integer argument, which is
//! widened before invocation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strum_macros::{AsRefStr, Display, EnumString};

use crate::eval::value::Value;

/// Declared parameter types for host method signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum ParamType {
    #[strum(serialize = "integer")]
    Integer,
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "string")]
    String,
    #[strum(serialize = "list")]
    List,
    #[strum(serialize = "map")]
    Map,
    #[strum(serialize = "object")]
    Object,
    #[strum(serialize = "any")]
    Any,
}

/// Implementation of one host method overload.
///
/// The first argument is the receiver value, `None` when the method
/// belongs to a namespace object. Failures surface as plain messages
/// and are wrapped into evaluation errors by the caller.
pub type HostFn = Arc<dyn Fn(Option<&Value>, &[Value]) -> Result<Value, String> + Send + Sync>;

/// One callable overload: a parameter signature plus its
/// implementation.
#[derive(Clone)]
pub struct HostMethod {
    pub params: Vec<ParamType>,
    pub func: HostFn,
}

impl fmt::Debug for HostMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMethod")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Callable host functionality exposed to expressions.
///
/// Implementations are shared across threads behind `Arc`, so interior
/// state must be `Send + Sync`.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Type name used in rendering and error messages.
    fn type_name(&self) -> &str;

    /// Namespace objects receive no receiver argument when invoked.
    fn is_namespace(&self) -> bool {
        false
    }

    /// All overloads registered under `name`, empty when unknown.
    fn methods(&self, name: &str) -> &[HostMethod];
}

/// Ready-made [`HostObject`] backed by a name-to-overloads table.
#[derive(Debug)]
pub struct MethodRegistry {
    type_name: String,
    namespace: bool,
    methods: HashMap<String, Vec<HostMethod>>,
}

impl MethodRegistry {
    /// A registry whose methods receive the enclosing value as their
    /// receiver.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: false,
            methods: HashMap::new(),
        }
    }

    /// A registry of free functions; its methods receive no receiver.
    pub fn namespace(type_name: impl Into<String>) -> Self {
        Self {
            namespace: true,
            ..Self::new(type_name)
        }
    }

    /// Registers one overload of `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, params: Vec<ParamType>, func: F)
    where
        F: Fn(Option<&Value>, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.methods.entry(name.into()).or_default().push(HostMethod {
            params,
            func: Arc::new(func),
        });
    }
}

impl HostObject for MethodRegistry {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn is_namespace(&self) -> bool {
        self.namespace
    }

    fn methods(&self, name: &str) -> &[HostMethod] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Picks the overload for the given arguments, preferring exact
/// signature matches over compatible ones.
pub(crate) fn select_overload<'m>(
    overloads: &'m [HostMethod],
    args: &[Value],
) -> Option<&'m HostMethod> {
    let mut compatible = None;
    for method in overloads.iter().filter(|m| m.params.len() == args.len()) {
        if exact_match(&method.params, args) {
            return Some(method);
        }
        if compatible.is_none() && compatible_match(&method.params, args) {
            compatible = Some(method);
        }
    }
    compatible
}

/// Reshapes arguments to the selected signature, widening integers
/// passed to float parameters.
pub(crate) fn widen_arguments(params: &[ParamType], args: Vec<Value>) -> Vec<Value> {
    params
        .iter()
        .zip(args)
        .map(|(param, arg)| match (param, arg) {
            (ParamType::Float, Value::Integer(i)) => Value::Float(i as f64),
            (_, arg) => arg,
        })
        .collect()
}

fn exact_match(params: &[ParamType], args: &[Value]) -> bool {
    params
        .iter()
        .zip(args)
        .all(|(param, arg)| arg.type_tag() == Some(*param))
}

fn compatible_match(params: &[ParamType], args: &[Value]) -> bool {
    params
        .iter()
        .zip(args)
        .all(|(param, arg)| match (param, arg.type_tag()) {
            (ParamType::Any, _) => true,
            (_, None) => false,
            (param, Some(tag)) => {
                *param == tag || (*param == ParamType::Float && tag == ParamType::Integer)
            }
        })
}
