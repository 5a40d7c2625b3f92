//! Configuration record types for `scaffold.yaml`.
//!
//! Questions, computed flags, feature rules, and hooks are parsed as plain
//! strings here; expressions and globs are compiled later by their consumers.

use crate::expr::Value;
use serde::{Deserialize, Serialize};

/// How a question is asked and what kind of value it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Free text (string).
    #[default]
    Input,
    /// One choice from `options` (string).
    Select,
    /// Any number of choices from `options` (list).
    Multi,
    /// Yes/no (bool).
    Confirm,
}

impl PromptKind {
    /// The value bound to an unanswered, non-required question.
    pub fn zero_value(self) -> Value {
        match self {
            PromptKind::Input | PromptKind::Select => Value::Str(String::new()),
            PromptKind::Multi => Value::List(Vec::new()),
            PromptKind::Confirm => Value::Bool(false),
        }
    }

    /// Parse a command-line answer (`--set name=value`).
    ///
    /// `multi` answers are comma separated; `confirm` accepts
    /// true/false/yes/no/y/n/1/0.
    pub fn parse_answer(self, raw: &str) -> Result<Value, String> {
        match self {
            PromptKind::Input | PromptKind::Select => Ok(Value::Str(raw.to_string())),
            PromptKind::Multi => Ok(Value::List(split_list(raw))),
            PromptKind::Confirm => parse_bool(raw).map(Value::Bool),
        }
    }

    /// Convert a YAML value (default or preset entry) into an answer value.
    pub fn coerce(self, raw: &serde_yaml::Value) -> Result<Value, String> {
        match (self, raw) {
            (PromptKind::Confirm, serde_yaml::Value::Bool(b)) => Ok(Value::Bool(*b)),
            (PromptKind::Confirm, serde_yaml::Value::String(s)) => parse_bool(s).map(Value::Bool),
            (PromptKind::Multi, serde_yaml::Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    yaml_scalar(item)
                        .ok_or_else(|| "list entries must be scalars".to_string())
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (PromptKind::Multi, serde_yaml::Value::String(s)) => Ok(Value::List(split_list(s))),
            (PromptKind::Input | PromptKind::Select, other) => yaml_scalar(other)
                .map(Value::Str)
                .ok_or_else(|| format!("expected a string, found {}", yaml_kind(other))),
            (kind, other) => Err(format!(
                "expected a {} answer, found {}",
                kind.answer_type(),
                yaml_kind(other)
            )),
        }
    }

    fn answer_type(self) -> &'static str {
        match self {
            PromptKind::Input | PromptKind::Select => "string",
            PromptKind::Multi => "list",
            PromptKind::Confirm => "boolean",
        }
    }
}

/// Prompt presentation for a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompt {
    /// Text shown to the user.
    pub message: String,

    /// Kind of prompt.
    pub kind: PromptKind,

    /// Choices for `select` and `multi`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Default answer, coerced according to `kind`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,
}

/// Answer validation rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    /// Minimum selection count (`multi`) or character count (`input`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,

    /// Maximum selection count (`multi`) or character count (`input`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    /// Regex the answer must match (`input` and `select`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Validation {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.pattern.is_none()
    }
}

/// A named input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub name: String,

    #[serde(default)]
    pub prompt: Prompt,

    /// Whether a value must be bound before rendering.
    #[serde(default = "default_true")]
    pub required: bool,

    /// Ask only when this expression (over earlier questions) is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    #[serde(default, skip_serializing_if = "Validation::is_empty")]
    pub validate: Validation,
}

impl Question {
    /// The configured default, coerced to a value.
    pub fn default_value(&self) -> Result<Option<Value>, String> {
        self.prompt
            .default
            .as_ref()
            .map(|raw| self.prompt.kind.coerce(raw))
            .transpose()
    }
}

/// A value derived from answers after they are final.
///
/// Exactly one of `expr` or `template` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedFlag {
    pub name: String,

    /// Expression, e.g. `"Go" in langs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,

    /// String template rendered with the content renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// Conditional inclusion of every file matching `globs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureRule {
    /// Condition expression.
    #[serde(alias = "value")]
    pub when: String,

    /// Globs over template-relative paths (forward slashes).
    pub globs: Vec<String>,
}

/// Post-generation command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HookStep {
    /// Display name for the step (e.g., "gofmt", "repin").
    pub name: String,

    /// Command to execute in the output directory (shell-words parsed; no shell).
    pub command: String,

    /// Run only when this expression is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}

/// Hook sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Hooks {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post: Vec<HookStep>,
}

impl Hooks {
    pub fn is_empty(&self) -> bool {
        self.post.is_empty()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(format!("expected a boolean (true/false/yes/no), found '{}'", other)),
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

// Default value functions for serde
pub(crate) fn default_template_dir() -> String {
    "template".to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
