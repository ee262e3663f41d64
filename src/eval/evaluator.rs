//! # Evaluator
//!
//! Tree-walking evaluation of compiled expressions against a borrowed
//! [`Environment`].
//!
//! ## Semantics
//!
//! - arithmetic always produces a float, so `1 + 1` renders as `"2.0"`
//! - unbound variables evaluate to [`Value::Null`] rather than erroring
//! - operands evaluate left to right; a call's target evaluates before
//!   its arguments
//! - index access validates the index before the base, truncates float
//!   indices toward zero and accepts positions in `[0, len)`
//! - keyed access on a string base returns the base unchanged, after
//!   both base and key have evaluated
//! - method calls dispatch through [`HostObject`] overload selection,
//!   widening integer arguments bound to float parameters

use std::sync::Arc;

use thiserror::Error;

use crate::ast::{Expression, Operator};
use crate::eval::environment::Environment;
use crate::eval::host::{select_overload, widen_arguments, HostObject};
use crate::eval::value::Value;

pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluation failures. Messages name the offending value's type so
/// templates can be debugged without a stack trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("{side} operand must be a number, but got {found}")]
    NonNumericOperand { side: &'static str, found: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("index must be a number, but got {found}")]
    NonNumericIndex { found: String },
    #[error("expected a list but got {found}")]
    NotIndexable { found: String },
    #[error("index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("expected a map but got {found}")]
    KeyAccessOnNonMap { found: String },
    #[error("expected a string key but got {found}")]
    NonStringKey { found: String },
    #[error("key '{key}' not found")]
    KeyNotFound { key: String },
    #[error("call target is null for method '{name}'")]
    NullCallTarget { name: String },
    #[error("no method '{name}' on {target} matching ({args})")]
    MethodNotFound {
        name: String,
        target: String,
        args: String,
    },
    #[error("error invoking method '{name}': {message}")]
    MethodInvocation { name: String, message: String },
}

/// Evaluates one expression to a value.
#[tracing::instrument(level = "debug", skip(env))]
pub fn evaluate(expression: &Expression, env: &Environment) -> EvalResult<Value> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Value::Integer(*value)),
        Expression::FloatLiteral(value) => Ok(Value::Float(*value)),
        Expression::StringLiteral(value) => Ok(Value::String(value.clone())),
        Expression::Variable(name) => {
            Ok(env.get_variable(name).cloned().unwrap_or(Value::Null))
        }
        Expression::BinaryOperation {
            left,
            operator,
            right,
        } => eval_binary_operation(left, *operator, right, env),
        Expression::ObjectKeyAccess { base, key } => eval_object_key_access(base, key, env),
        Expression::ArrayAccess { base, index } => eval_array_access(base, index, env),
        Expression::FunctionCall {
            target,
            name,
            arguments,
        } => eval_function_call(target, name, arguments, env),
    }
}

fn eval_binary_operation(
    left: &Expression,
    operator: Operator,
    right: &Expression,
    env: &Environment,
) -> EvalResult<Value> {
    let left = numeric_operand("left", evaluate(left, env)?)?;
    let right = numeric_operand("right", evaluate(right, env)?)?;
    if operator == Operator::Divide && right == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(operator.apply(left, right)))
}

fn numeric_operand(side: &'static str, value: Value) -> EvalResult<f64> {
    match value {
        Value::Integer(value) => Ok(value as f64),
        Value::Float(value) => Ok(value),
        other => Err(EvalError::NonNumericOperand {
            side,
            found: other.type_name().to_string(),
        }),
    }
}

fn eval_array_access(
    base: &Expression,
    index: &Expression,
    env: &Environment,
) -> EvalResult<Value> {
    let base = evaluate(base, env)?;
    let index = evaluate(index, env)?;
    // index checks run before base checks
    let position = match index {
        Value::Integer(value) => value,
        Value::Float(value) => value as i64,
        other => {
            return Err(EvalError::NonNumericIndex {
                found: other.type_name().to_string(),
            })
        }
    };
    let items = match base {
        Value::List(items) => items,
        other => {
            return Err(EvalError::NotIndexable {
                found: other.type_name().to_string(),
            })
        }
    };
    if position < 0 || position as usize >= items.len() {
        return Err(EvalError::IndexOutOfBounds {
            index: position,
            length: items.len(),
        });
    }
    Ok(items[position as usize].clone())
}

fn eval_object_key_access(
    base: &Expression,
    key: &Expression,
    env: &Environment,
) -> EvalResult<Value> {
    let base = evaluate(base, env)?;
    let key = evaluate(key, env)?;
    // string bases pass through untouched, but only after the key has
    // evaluated, so key errors still surface
    if matches!(base, Value::String(_)) {
        return Ok(base);
    }
    let entries = match base {
        Value::Map(entries) => entries,
        other => {
            return Err(EvalError::KeyAccessOnNonMap {
                found: other.type_name().to_string(),
            })
        }
    };
    let key = match key {
        Value::String(key) => key,
        other => {
            return Err(EvalError::NonStringKey {
                found: other.type_name().to_string(),
            })
        }
    };
    entries
        .get(&key)
        .cloned()
        .ok_or(EvalError::KeyNotFound { key })
}

fn eval_function_call(
    target: &Expression,
    name: &str,
    arguments: &[Expression],
    env: &Environment,
) -> EvalResult<Value> {
    let target = evaluate(target, env)?;
    let mut args = Vec::with_capacity(arguments.len());
    for argument in arguments {
        args.push(evaluate(argument, env)?);
    }

    let host: Arc<dyn HostObject> = match &target {
        Value::Object(host) => Arc::clone(host),
        Value::Null => {
            return Err(EvalError::NullCallTarget {
                name: name.to_string(),
            })
        }
        other => return Err(method_not_found(name, other.type_name(), &args)),
    };

    let method = select_overload(host.methods(name), &args)
        .ok_or_else(|| method_not_found(name, host.type_name(), &args))?;
    let args = widen_arguments(&method.params, args);
    let receiver = if host.is_namespace() {
        None
    } else {
        Some(&target)
    };
    (method.func)(receiver, &args).map_err(|message| EvalError::MethodInvocation {
        name: name.to_string(),
        message,
    })
}

fn method_not_found(name: &str, target: &str, args: &[Value]) -> EvalError {
    let args = args
        .iter()
        .map(Value::type_name)
        .collect::<Vec<_>>()
        .join(", ");
    EvalError::MethodNotFound {
        name: name.to_string(),
        target: target.to_string(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::host::{MethodRegistry, ParamType};
    use crate::parser::Parser;
    use crate::tokenizer::lexer::Lexer;
    use std::collections::HashMap;

    fn fixture_env() -> Environment {
        let mut env = Environment::new();
        env.set_variable("count", Value::Integer(3));
        env.set_variable("half", Value::Float(0.5));
        env.set_variable("name", Value::String("kangert".to_string()));
        env.set_variable("keyName", Value::String("a".to_string()));

        let mut obj = HashMap::new();
        obj.insert("a".to_string(), Value::String("kangert".to_string()));
        env.set_variable("obj", Value::Map(obj.clone()));
        env.set_variable(
            "test",
            Value::List(vec![Value::Integer(1), Value::Map(obj)]),
        );
        env
    }

    fn eval(input: &str, env: &Environment) -> EvalResult<Value> {
        let tokens = Lexer::new(input).tokenize().unwrap();
        let expressions = Parser::new(tokens).parse().unwrap();
        assert_eq!(expressions.len(), 1);
        evaluate(&expressions[0], env)
    }

    #[test]
    fn test_literals() {
        let env = Environment::new();
        assert_eq!(eval("${42}", &env), Ok(Value::Integer(42)));
        assert_eq!(eval("${0.5}", &env), Ok(Value::Float(0.5)));
        assert_eq!(
            eval("${'hi'}", &env),
            Ok(Value::String("hi".to_string()))
        );
    }

    #[test]
    fn test_variable_lookup() {
        let env = fixture_env();
        assert_eq!(eval("${count}", &env), Ok(Value::Integer(3)));
        assert_eq!(eval("${missing}", &env), Ok(Value::Null));
    }

    #[test]
    fn test_arithmetic_produces_floats() {
        let env = fixture_env();
        assert_eq!(eval("${1 + 1}", &env), Ok(Value::Float(2.0)));
        assert_eq!(eval("${1+1+1*2}", &env), Ok(Value::Float(4.0)));
        assert_eq!(eval("${1 - count}", &env), Ok(Value::Float(-2.0)));
        assert_eq!(eval("${2 * half}", &env), Ok(Value::Float(1.0)));
        assert_eq!(eval("${1 / 2}", &env), Ok(Value::Float(0.5)));
    }

    #[test]
    fn test_division_by_zero() {
        let env = Environment::new();
        assert_eq!(eval("${1 / 0}", &env), Err(EvalError::DivisionByZero));
        // a computed zero divisor is caught too
        assert_eq!(
            eval("${1 / (1 - 1)}", &env),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_non_numeric_operands() {
        let env = fixture_env();
        assert_eq!(
            eval("${name + 1}", &env),
            Err(EvalError::NonNumericOperand {
                side: "left",
                found: "string".to_string(),
            })
        );
        assert_eq!(
            eval("${1 + name}", &env),
            Err(EvalError::NonNumericOperand {
                side: "right",
                found: "string".to_string(),
            })
        );
    }

    #[test]
    fn test_left_operand_error_wins() {
        let env = fixture_env();
        assert_eq!(
            eval("${(1 / 0) + name}", &env),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_array_access() {
        let env = fixture_env();
        assert_eq!(eval("${test[0]}", &env), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_float_index_truncates() {
        let env = fixture_env();
        // 0.5 truncates to index 0
        assert_eq!(eval("${test[half]}", &env), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let env = fixture_env();
        assert_eq!(
            eval("${test[5]}", &env),
            Err(EvalError::IndexOutOfBounds {
                index: 5,
                length: 2,
            })
        );

        let negative = Expression::ArrayAccess {
            base: Box::new(Expression::Variable("test".to_string())),
            index: Box::new(Expression::IntegerLiteral(-1)),
        };
        assert_eq!(
            evaluate(&negative, &env),
            Err(EvalError::IndexOutOfBounds {
                index: -1,
                length: 2,
            })
        );
    }

    #[test]
    fn test_not_indexable() {
        let env = fixture_env();
        assert_eq!(
            eval("${count[0]}", &env),
            Err(EvalError::NotIndexable {
                found: "integer".to_string(),
            })
        );
    }

    #[test]
    fn test_index_checked_before_base() {
        let env = fixture_env();
        // neither a list base nor a numeric index; the index reports
        let expr = Expression::ArrayAccess {
            base: Box::new(Expression::Variable("name".to_string())),
            index: Box::new(Expression::StringLiteral("x".to_string())),
        };
        assert_eq!(
            evaluate(&expr, &env),
            Err(EvalError::NonNumericIndex {
                found: "string".to_string(),
            })
        );
    }

    #[test]
    fn test_key_access() {
        let env = fixture_env();
        let kangert = Ok(Value::String("kangert".to_string()));
        assert_eq!(eval("${obj.a}", &env), kangert);
        assert_eq!(eval("${obj['a']}", &env), kangert);
        assert_eq!(eval("${obj[keyName]}", &env), kangert);
        assert_eq!(eval("${test[1].a}", &env), kangert);
    }

    #[test]
    fn test_string_base_passes_through() {
        let env = fixture_env();
        assert_eq!(
            eval("${name.anything}", &env),
            Ok(Value::String("kangert".to_string()))
        );
    }

    #[test]
    fn test_key_evaluates_before_string_passthrough() {
        let env = fixture_env();
        assert_eq!(
            eval("${name[1 / 0]}", &env),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_key_not_found() {
        let env = fixture_env();
        assert_eq!(
            eval("${obj.missing}", &env),
            Err(EvalError::KeyNotFound {
                key: "missing".to_string(),
            })
        );
    }

    #[test]
    fn test_key_access_on_non_map() {
        let env = fixture_env();
        assert_eq!(
            eval("${count.a}", &env),
            Err(EvalError::KeyAccessOnNonMap {
                found: "integer".to_string(),
            })
        );
    }

    #[test]
    fn test_non_string_key() {
        let env = fixture_env();
        assert_eq!(
            eval("${obj[count]}", &env),
            Err(EvalError::NonStringKey {
                found: "integer".to_string(),
            })
        );
    }

    #[test]
    fn test_namespace_method_gets_no_receiver() {
        let mut registry = MethodRegistry::namespace("Util");
        registry.register("ping", vec![], |receiver, _| {
            assert!(receiver.is_none());
            Ok(Value::String("pong".to_string()))
        });
        let mut env = Environment::new();
        env.set_variable("util", Value::Object(Arc::new(registry)));

        assert_eq!(
            eval("${util.ping()}", &env),
            Ok(Value::String("pong".to_string()))
        );
    }

    #[test]
    fn test_instance_method_gets_receiver() {
        let mut registry = MethodRegistry::new("Greeter");
        registry.register("describe", vec![], |receiver, _| {
            let receiver = receiver.expect("instance methods have a receiver");
            Ok(Value::String(receiver.type_name().to_string()))
        });
        let mut env = Environment::new();
        env.set_variable("greeter", Value::Object(Arc::new(registry)));

        assert_eq!(
            eval("${greeter.describe()}", &env),
            Ok(Value::String("Greeter".to_string()))
        );
    }

    #[test]
    fn test_integer_argument_widens_for_float_parameter() {
        let mut registry = MethodRegistry::namespace("Math");
        registry.register("half", vec![ParamType::Float], |_, args| {
            match args[0] {
                Value::Float(value) => Ok(Value::Float(value / 2.0)),
                ref other => Err(format!("expected a float, got {}", other.type_name())),
            }
        });
        let mut env = Environment::new();
        env.set_variable("math", Value::Object(Arc::new(registry)));

        assert_eq!(eval("${math.half(4)}", &env), Ok(Value::Float(2.0)));
    }

    #[test]
    fn test_null_call_target() {
        let env = Environment::new();
        assert_eq!(
            eval("${ghost.call()}", &env),
            Err(EvalError::NullCallTarget {
                name: "call".to_string(),
            })
        );
    }

    #[test]
    fn test_argument_error_beats_null_target() {
        let env = Environment::new();
        // arguments evaluate before the target's shape is checked
        assert_eq!(
            eval("${ghost.call(1 / 0)}", &env),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_method_not_found() {
        let mut registry = MethodRegistry::namespace("Util");
        registry.register("ping", vec![], |_, _| Ok(Value::Null));
        let mut env = fixture_env();
        env.set_variable("util", Value::Object(Arc::new(registry)));

        assert_eq!(
            eval("${util.pong()}", &env),
            Err(EvalError::MethodNotFound {
                name: "pong".to_string(),
                target: "Util".to_string(),
                args: String::new(),
            })
        );
        // a known name with an incompatible signature reports the
        // argument types
        assert_eq!(
            eval("${util.ping(1, name)}", &env),
            Err(EvalError::MethodNotFound {
                name: "ping".to_string(),
                target: "Util".to_string(),
                args: "integer, string".to_string(),
            })
        );
    }

    #[test]
    fn test_call_on_non_object() {
        let env = fixture_env();
        assert_eq!(
            eval("${count.describe()}", &env),
            Err(EvalError::MethodNotFound {
                name: "describe".to_string(),
                target: "integer".to_string(),
                args: String::new(),
            })
        );
    }

    #[test]
    fn test_method_invocation_error() {
        let mut registry = MethodRegistry::namespace("Util");
        registry.register("fail", vec![], |_, _| Err("boom".to_string()));
        let mut env = Environment::new();
        env.set_variable("util", Value::Object(Arc::new(registry)));

        assert_eq!(
            eval("${util.fail()}", &env),
            Err(EvalError::MethodInvocation {
                name: "fail".to_string(),
                message: "boom".to_string(),
            })
        );
    }
}
