//! Configuration model for scaffold.
//!
//! This module defines the Config struct that represents `scaffold.yaml` in a
//! template source directory. It supports forward-compatible YAML parsing
//! (unknown fields are ignored), sensible defaults for optional fields, and
//! static validation of every name, expression, glob, default, and preset.

mod model;
mod operations;
pub mod types;
mod validation;


// Re-export public API
pub use model::{Config, Preset};
pub use operations::CONFIG_FILE;
pub use types::{
    ComputedFlag, FeatureRule, HookStep, Hooks, Prompt, PromptKind, Question, Validation,
};
pub(crate) use validation::option_violation;
