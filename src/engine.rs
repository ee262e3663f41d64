//! # Engine
//!
//! Front door of the crate: takes raw input text, runs the
//! tokenize/parse pipeline once per distinct input, caches the compiled
//! expressions and assembles evaluation results back into output text.
//!
//! The cache is keyed by the full input text and shared across threads.
//! Two threads compiling the same input concurrently both produce the
//! same expression sequence, so the racing inserts are benign and the
//! last one wins. Failed compilations are never cached.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::ast::Expression;
use crate::error::ExpressionResult;
use crate::eval::environment::Environment;
use crate::eval::evaluator::evaluate;
use crate::eval::value::Value;
use crate::parser::Parser;
use crate::tokenizer::lexer::Lexer;

/// Compiles, caches and executes embedded-expression text.
pub struct ExpressionEngine {
    cache: DashMap<String, Arc<Vec<Expression>>>,
    last_execution_micros: AtomicU64,
}

impl ExpressionEngine {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            last_execution_micros: AtomicU64::new(0),
        }
    }

    /// Executes `input` against `env` and returns the assembled output.
    ///
    /// Literal text outside `${...}` spans is reproduced verbatim; span
    /// results are stringified in place, except nulls, which contribute
    /// nothing.
    #[tracing::instrument(level = "debug", skip(self, env))]
    pub fn execute(&self, input: &str, env: &Environment) -> ExpressionResult<String> {
        let started = Instant::now();
        let result = self.execute_inner(input, env);
        let elapsed_micros = started.elapsed().as_micros() as u64;
        self.last_execution_micros
            .store(elapsed_micros, Ordering::Relaxed);
        tracing::debug!(elapsed_micros, ok = result.is_ok(), "execution finished");
        result
    }

    fn execute_inner(&self, input: &str, env: &Environment) -> ExpressionResult<String> {
        let expressions = self.compile(input)?;
        let mut output = String::new();
        for expression in expressions.iter() {
            let value = evaluate(expression, env)?;
            if !matches!(value, Value::Null) {
                output.push_str(&value.to_string());
            }
        }
        Ok(output)
    }

    /// Returns the compiled form of `input`, from cache when present.
    fn compile(&self, input: &str) -> ExpressionResult<Arc<Vec<Expression>>> {
        if let Some(cached) = self.cache.get(input) {
            tracing::debug!(input, "compilation cache hit");
            return Ok(Arc::clone(cached.value()));
        }
        tracing::debug!(input, "compiling uncached input");
        let tokens = Lexer::new(input).tokenize()?;
        let expressions = Arc::new(Parser::new(tokens).parse()?);
        self.cache
            .insert(input.to_string(), Arc::clone(&expressions));
        Ok(expressions)
    }

    /// Number of distinct inputs currently cached.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached compilation.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Wall-clock duration of the most recent [`execute`] call, zero
    /// before the first one.
    ///
    /// [`execute`]: ExpressionEngine::execute
    pub fn last_execution_time(&self) -> Duration {
        Duration::from_micros(self.last_execution_micros.load(Ordering::Relaxed))
    }
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}
