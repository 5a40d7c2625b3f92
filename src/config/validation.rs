//! Static analysis of a parsed configuration.
//!
//! Every check reports the offending name as `section.name` so users can find
//! it in `scaffold.yaml`.

use super::model::Config;
use super::types::{PromptKind, Question};
use crate::error::{Result, ScaffoldError};
use crate::expr::{self, Expr};
use crate::template::Template;
use globset::Glob;
use regex::Regex;
use std::collections::HashSet;

pub(super) fn validate_config(config: &Config) -> Result<()> {
    validate_template_dir(&config.template_dir)?;
    let question_names = validate_questions(&config.questions)?;
    let defined = validate_computed(config, &question_names)?;

    for (i, rule) in config.features.iter().enumerate() {
        let label = format!("features[{}]", i);
        let expr = parse_condition(&label, &rule.when)?;
        check_refs(&label, &expr, |name| defined.contains(name))?;
        if rule.globs.is_empty() {
            return Err(ScaffoldError::config(label, "feature rule has no globs"));
        }
        validate_globs(&label, &rule.globs)?;
    }

    validate_globs("skip", &config.skip)?;

    for step in &config.hooks.post {
        let label = format!("hooks.post.{}", step.name);
        if step.name.trim().is_empty() {
            return Err(ScaffoldError::config("hooks.post", "hook step has no name"));
        }
        let args = shell_words::split(&step.command).map_err(|e| {
            ScaffoldError::config(&label, format!("failed to parse command: {}", e))
        })?;
        if args.is_empty() {
            return Err(ScaffoldError::config(&label, "command is empty"));
        }
        if let Some(when) = &step.when {
            let expr = parse_condition(&label, when)?;
            check_refs(&label, &expr, |name| defined.contains(name))?;
        }
    }

    for (preset_name, answers) in &config.presets {
        for (key, raw) in answers {
            let label = format!("presets.{}.{}", preset_name, key);
            let question = config
                .question(key)
                .ok_or_else(|| ScaffoldError::config(&label, "no question with this name"))?;
            let value = question
                .prompt
                .kind
                .coerce(raw)
                .map_err(|reason| ScaffoldError::config(&label, reason))?;
            check_options(&label, question, &value)?;
        }
    }

    Ok(())
}

fn validate_template_dir(dir: &str) -> Result<()> {
    let path = std::path::Path::new(dir);
    if dir.trim().is_empty()
        || path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(ScaffoldError::config(
            "template_dir",
            format!("must be a relative path inside the source directory (found '{}')", dir),
        ));
    }
    Ok(())
}

fn validate_questions(questions: &[Question]) -> Result<Vec<&str>> {
    let mut seen: Vec<&str> = Vec::with_capacity(questions.len());

    for question in questions {
        let label = format!("questions.{}", question.name);
        check_identifier(&label, &question.name)?;
        if seen.contains(&question.name.as_str()) {
            return Err(ScaffoldError::config(label, "duplicate question name"));
        }

        let kind = question.prompt.kind;
        if matches!(kind, PromptKind::Select | PromptKind::Multi) && question.prompt.options.is_empty()
        {
            return Err(ScaffoldError::config(
                &label,
                "select and multi questions need at least one option",
            ));
        }

        if let Some(value) = question
            .default_value()
            .map_err(|reason| ScaffoldError::config(&label, format!("invalid default: {}", reason)))?
        {
            check_options(&label, question, &value)?;
        }

        let rule = &question.validate;
        if let (Some(min), Some(max)) = (rule.min, rule.max)
            && min > max
        {
            return Err(ScaffoldError::config(
                &label,
                format!("validate.min ({}) is greater than validate.max ({})", min, max),
            ));
        }
        if let Some(pattern) = &rule.pattern {
            Regex::new(pattern).map_err(|e| {
                ScaffoldError::config(&label, format!("invalid validate.pattern '{}': {}", pattern, e))
            })?;
        }

        if let Some(when) = &question.when {
            let expr = parse_condition(&label, when)?;
            check_refs(&label, &expr, |name| seen.contains(&name))?;
        }

        seen.push(&question.name);
    }

    Ok(seen)
}

/// Validate computed flags and return every defined name (questions + computed).
fn validate_computed<'a>(config: &'a Config, questions: &[&'a str]) -> Result<HashSet<&'a str>> {
    let mut defined: HashSet<&str> = questions.iter().copied().collect();
    let all_computed: Vec<&str> = config.computed.iter().map(|c| c.name.as_str()).collect();

    for flag in &config.computed {
        let label = format!("computed.{}", flag.name);
        check_identifier(&label, &flag.name)?;
        if defined.contains(flag.name.as_str()) {
            return Err(ScaffoldError::config(
                label,
                "name is already used by a question or an earlier computed flag",
            ));
        }

        let refs: Vec<String> = match (&flag.expr, &flag.template) {
            (Some(src), None) => {
                let expr = parse_condition(&label, src)?;
                expr.references().into_iter().map(String::from).collect()
            }
            (None, Some(src)) => {
                let template = Template::parse(src).map_err(|e| {
                    ScaffoldError::config(&label, format!("invalid template: {}", e))
                })?;
                template.references().into_iter().map(String::from).collect()
            }
            _ => {
                return Err(ScaffoldError::config(
                    label,
                    "exactly one of 'expr' or 'template' must be set",
                ));
            }
        };

        for name in &refs {
            if defined.contains(name.as_str()) {
                continue;
            }
            let reason = if *name == flag.name {
                "references itself (cyclic definition)".to_string()
            } else if all_computed.contains(&name.as_str()) {
                format!(
                    "references computed flag '{}' before it is defined (cyclic or out-of-order definition)",
                    name
                )
            } else {
                format!("references undefined name '{}'", name)
            };
            return Err(ScaffoldError::config(label, reason));
        }

        defined.insert(&flag.name);
    }

    Ok(defined)
}

fn parse_condition(label: &str, src: &str) -> Result<Expr> {
    let expr = expr::parse(src).map_err(|e| {
        ScaffoldError::config(label, format!("invalid expression '{}': {}", src, e))
    })?;
    if expr.uses_dot() {
        return Err(ScaffoldError::config(
            label,
            format!("'.' is only valid inside a range block (in '{}')", src),
        ));
    }
    Ok(expr)
}

fn check_refs(label: &str, expr: &Expr, is_defined: impl Fn(&str) -> bool) -> Result<()> {
    match expr.references().into_iter().find(|name| !is_defined(name)) {
        Some(name) => Err(ScaffoldError::config(
            label,
            format!("references undefined name '{}'", name),
        )),
        None => Ok(()),
    }
}

fn check_identifier(label: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ScaffoldError::config(
            label,
            "names must start with a letter or '_' and contain only letters, digits, and '_'",
        ))
    }
}

fn validate_globs(label: &str, globs: &[String]) -> Result<()> {
    for pattern in globs {
        Glob::new(&pattern.replace('\\', "/")).map_err(|e| {
            ScaffoldError::config(label, format!("invalid glob pattern '{}': {}", pattern, e))
        })?;
    }
    Ok(())
}

/// Check that select/multi values are drawn from the question's options.
fn check_options(label: &str, question: &Question, value: &expr::Value) -> Result<()> {
    match option_violation(question, value) {
        Some(reason) => Err(ScaffoldError::config(label, reason)),
        None => Ok(()),
    }
}

/// Describe why `value` is not an allowed choice for `question`, if it is not.
pub(crate) fn option_violation(question: &Question, value: &expr::Value) -> Option<String> {
    let options = &question.prompt.options;
    let outside = match (question.prompt.kind, value) {
        (PromptKind::Select, expr::Value::Str(s)) if !s.is_empty() => {
            (!options.contains(s)).then(|| s.clone())
        }
        (PromptKind::Multi, expr::Value::List(items)) => {
            items.iter().find(|item| !options.contains(item)).cloned()
        }
        _ => None,
    };

    outside.map(|choice| {
        format!(
            "'{}' is not one of the options ({})",
            choice,
            options.join(", ")
        )
    })
}
