//! # Evaluation
//!
//! Runtime half of the pipeline: the value model, the variable
//! environment supplied by the caller, the host method surface, and the
//! tree-walking evaluator itself.

pub mod environment;
pub mod evaluator;
pub mod host;
pub mod value;
