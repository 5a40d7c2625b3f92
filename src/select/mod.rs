//! Feature rule file selection.
//!
//! Every file in the template tree is decided independently:
//! - No rule's globs match the path -> included (default include)
//! - At least one matching rule's condition is true -> included
//! - Every matching rule's condition is false -> excluded
//!
//! All matching rules are evaluated, so an expression error in any of them
//! surfaces no matter how the rules are ordered.

use crate::config::FeatureRule;
use crate::error::{Result, ScaffoldError};
use crate::expr::{self, Expr, Scope};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Why a file was included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// No rule matched the path.
    DefaultInclude,
    /// The first matching rule (by index) whose condition was true.
    Rule(usize),
}

/// Selection outcome for one template path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Included(Inclusion),
    /// Indices of the matching rules, all of which evaluated false.
    Excluded { rules: Vec<usize> },
}

#[derive(Debug, Clone)]
struct CompiledRule {
    condition: Expr,
    globs: GlobSet,
}

/// Feature rules with conditions parsed and globs compiled.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    rules: Vec<CompiledRule>,
}

impl FeatureSet {
    /// Compile feature rules.
    ///
    /// # Returns
    ///
    /// * `Ok(FeatureSet)` - All conditions parsed and globs compiled
    /// * `Err(ScaffoldError::ConfigValidation)` - A condition or glob is invalid
    pub fn compile(rules: &[FeatureRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let label = rule_label(i);
                let condition = expr::parse(&rule.when).map_err(|e| {
                    ScaffoldError::config(
                        &label,
                        format!("invalid expression '{}': {}", rule.when, e),
                    )
                })?;
                let globs = build_globset(&rule.globs, &label)?;
                Ok(CompiledRule { condition, globs })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide whether the template file at `path` is included.
    ///
    /// `path` is relative to the template root; backslashes are normalized.
    pub fn decide(&self, path: &str, scope: &Scope<'_>) -> Result<Decision> {
        let path = normalize_path(path);
        let mut matched = Vec::new();
        let mut first_true = None;

        for (i, rule) in self.rules.iter().enumerate() {
            if !rule.globs.is_match(&path) {
                continue;
            }
            matched.push(i);

            let hit = expr::eval_bool(&rule.condition, scope).map_err(|e| {
                ScaffoldError::expression(format!("{} (file '{}')", rule_label(i), path), e)
            })?;
            if hit && first_true.is_none() {
                first_true = Some(i);
            }
        }

        Ok(match (first_true, matched.is_empty()) {
            (Some(i), _) => Decision::Included(Inclusion::Rule(i)),
            (None, true) => Decision::Included(Inclusion::DefaultInclude),
            (None, false) => Decision::Excluded { rules: matched },
        })
    }
}

fn rule_label(index: usize) -> String {
    format!("features[{}]", index)
}

/// Build a GlobSet from a list of glob patterns.
pub(crate) fn build_globset(patterns: &[String], field_name: &str) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(&normalize_path(pattern)).map_err(|e| {
            ScaffoldError::config(
                field_name,
                format!("invalid glob pattern '{}': {}", pattern, e),
            )
        })?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| ScaffoldError::config(field_name, format!("failed to compile globs: {}", e)))
}

/// Normalize a file path to use forward slashes.
pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests;
