//! Computed flag derivation.
//!
//! Computed flags are evaluated once, after every answer is final, in
//! declaration order. Each flag sees the answers plus every earlier flag.

use crate::config::Config;
use crate::error::{Result, ScaffoldError};
use crate::expr::{self, Env, Scope, Value};
use crate::template::{self, TemplateError};
use tracing::debug;

/// Extend `answers` with every computed flag.
///
/// Static validation already rejects undefined and out-of-order references;
/// a reference that still fails to resolve here is reported as an
/// [`ScaffoldError::Expression`] naming the flag.
pub fn derive(config: &Config, answers: &Env) -> Result<Env> {
    let mut env = answers.clone();

    for flag in &config.computed {
        let label = format!("computed.{}", flag.name);

        let value = match (&flag.expr, &flag.template) {
            (Some(src), None) => {
                let parsed = expr::parse(src).map_err(|e| {
                    ScaffoldError::config(&label, format!("invalid expression '{}': {}", src, e))
                })?;
                expr::eval(&parsed, &Scope::new(&env))
                    .map_err(|e| ScaffoldError::expression(&label, e))?
            }
            (None, Some(src)) => match template::render_str(src, &Scope::new(&env)) {
                Ok(rendered) => Value::Str(rendered),
                Err(TemplateError::Parse(e)) => return Err(ScaffoldError::template(&label, e)),
                Err(TemplateError::Render(e)) => return Err(ScaffoldError::render(&label, e)),
            },
            _ => {
                return Err(ScaffoldError::config(
                    label,
                    "exactly one of 'expr' or 'template' must be set",
                ));
            }
        };

        debug!(flag = %flag.name, value = %value, "computed flag");
        env.insert(flag.name.clone(), value);
    }

    Ok(env)
}
