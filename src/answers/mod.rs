//! Answer resolution.
//!
//! Each question is bound exactly once, in declaration order, from the highest
//! precedence source that provides it:
//!
//! 1. `--set name=value` overrides
//! 2. the selected preset
//! 3. an interactive prompt (unless running with `--no-prompt`)
//! 4. the question's default
//!
//! A required question left without a value is a [`ScaffoldError::MissingAnswer`].
//! Questions whose `when` condition is false bind their zero value and are not asked.

mod prompt;


use crate::config::{Config, Preset, PromptKind, Question, option_violation};
use crate::error::{Result, ScaffoldError};
use crate::expr::{self, Env, Scope, Value};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::warn;

pub use prompt::{DialoguerPrompter, Prompter};

/// Where answers come from for one run.
#[derive(Debug, Default)]
pub struct AnswerSources<'a> {
    /// Answers from `--preset`.
    pub preset: Option<&'a Preset>,
    /// Raw `--set name=value` pairs.
    pub overrides: BTreeMap<String, String>,
}

/// Resolve and validate every question's answer.
///
/// Pass `None` for `prompter` to run non-interactively.
pub fn resolve(
    config: &Config,
    sources: &AnswerSources<'_>,
    mut prompter: Option<&mut dyn Prompter>,
) -> Result<Env> {
    for name in sources.overrides.keys() {
        if config.question(name).is_none() {
            return Err(ScaffoldError::config(
                format!("--set {}", name),
                "no question with this name",
            ));
        }
    }

    let mut answers = Env::new();

    for question in &config.questions {
        let kind = question.prompt.kind;

        if let Some(when) = &question.when {
            let label = format!("questions.{}.when", question.name);
            let cond = expr::parse(when)
                .map_err(|e| ScaffoldError::config(&label, format!("invalid expression: {}", e)))?;
            let ask = expr::eval_bool(&cond, &Scope::new(&answers))
                .map_err(|e| ScaffoldError::expression(label, e))?;
            if !ask {
                if let Some(source) = ignored_answer_source(question, sources) {
                    warn!(
                        question = %question.name,
                        source,
                        "ignoring answer for question whose condition is false"
                    );
                }
                answers.insert(question.name.clone(), kind.zero_value());
                continue;
            }
        }

        let default = question
            .default_value()
            .map_err(|reason| ScaffoldError::config(format!("questions.{}", question.name), reason))?;

        let provided = if let Some(raw) = sources.overrides.get(&question.name) {
            Some(kind.parse_answer(raw).map_err(|reason| ScaffoldError::InvalidAnswer {
                name: question.name.clone(),
                reason,
            })?)
        } else if let Some(raw) = sources.preset.and_then(|p| p.get(&question.name)) {
            Some(kind.coerce(raw).map_err(|reason| ScaffoldError::InvalidAnswer {
                name: question.name.clone(),
                reason,
            })?)
        } else if let Some(prompter) = prompter.as_deref_mut() {
            Some(prompter.ask(question, default.as_ref())?)
        } else {
            None
        };

        let value = match provided.or(default) {
            Some(value) => {
                validate_answer(question, &value)?;
                value
            }
            None if question.required => {
                return Err(ScaffoldError::MissingAnswer(question.name.clone()));
            }
            None => kind.zero_value(),
        };

        answers.insert(question.name.clone(), value);
    }

    Ok(answers)
}

/// The source of an answer that a false `when` condition discards, if any.
fn ignored_answer_source(question: &Question, sources: &AnswerSources<'_>) -> Option<&'static str> {
    if sources.overrides.contains_key(&question.name) {
        Some("--set")
    } else if sources.preset.is_some_and(|p| p.contains_key(&question.name)) {
        Some("preset")
    } else {
        None
    }
}

/// Check an answer against its question's options and validation rule.
pub fn validate_answer(question: &Question, value: &Value) -> Result<()> {
    let invalid = |reason: String| ScaffoldError::InvalidAnswer {
        name: question.name.clone(),
        reason,
    };

    if question.required
        && matches!(question.prompt.kind, PromptKind::Input | PromptKind::Select)
        && matches!(value, Value::Str(s) if s.trim().is_empty())
    {
        return Err(ScaffoldError::MissingAnswer(question.name.clone()));
    }

    if let Some(reason) = option_violation(question, value) {
        return Err(invalid(reason));
    }

    let (count, unit) = match value {
        Value::List(items) => (items.len(), "selection(s)"),
        Value::Str(s) => (s.chars().count(), "character(s)"),
        Value::Bool(_) => return Ok(()),
    };

    let rule = &question.validate;
    if let Some(min) = rule.min
        && count < min
    {
        return Err(invalid(format!("expected at least {} {}, got {}", min, unit, count)));
    }
    if let Some(max) = rule.max
        && count > max
    {
        return Err(invalid(format!("expected at most {} {}, got {}", max, unit, count)));
    }

    if let (Some(pattern), Value::Str(s)) = (&rule.pattern, value) {
        let re = Regex::new(pattern)
            .map_err(|e| invalid(format!("invalid pattern '{}': {}", pattern, e)))?;
        if !re.is_match(s) {
            return Err(invalid(format!("'{}' does not match pattern '{}'", s, pattern)));
        }
    }

    Ok(())
}

/// Parse `name=value` pairs from the command line.
pub fn parse_overrides(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    let mut overrides = BTreeMap::new();
    for pair in pairs {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            ScaffoldError::UserError(format!(
                "invalid --set '{}': expected name=value",
                pair
            ))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ScaffoldError::UserError(format!(
                "invalid --set '{}': name is empty",
                pair
            )));
        }
        overrides.insert(name.to_string(), value.to_string());
    }
    Ok(overrides)
}
