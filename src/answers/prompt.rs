//! Interactive prompting.

use crate::config::{PromptKind, Question};
use crate::error::{Result, ScaffoldError};
use crate::expr::Value;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

/// Asks the user for one answer.
///
/// The default (already coerced to the question's kind) should be offered as
/// the pre-filled or pre-selected choice.
pub trait Prompter {
    fn ask(&mut self, question: &Question, default: Option<&Value>) -> Result<Value>;
}

/// Terminal prompts via dialoguer.
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, question: &Question, default: Option<&Value>) -> Result<Value> {
        let message = if question.prompt.message.is_empty() {
            question.name.as_str()
        } else {
            question.prompt.message.as_str()
        };
        let options = &question.prompt.options;
        let failed = |e: dialoguer::Error| {
            ScaffoldError::UserError(format!("prompt for '{}' failed: {}", question.name, e))
        };

        let value = match question.prompt.kind {
            PromptKind::Input => {
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(message)
                    .allow_empty(!question.required);
                if let Some(Value::Str(d)) = default {
                    input = input.default(d.clone());
                }
                Value::Str(input.interact_text().map_err(failed)?)
            }
            PromptKind::Select => {
                let initial = match default {
                    Some(Value::Str(d)) => options.iter().position(|o| o == d).unwrap_or(0),
                    _ => 0,
                };
                let index = Select::with_theme(&self.theme)
                    .with_prompt(message)
                    .items(options)
                    .default(initial)
                    .interact()
                    .map_err(failed)?;
                Value::Str(options[index].clone())
            }
            PromptKind::Multi => {
                let checked: Vec<bool> = match default {
                    Some(Value::List(d)) => options.iter().map(|o| d.contains(o)).collect(),
                    _ => vec![false; options.len()],
                };
                let indices = MultiSelect::with_theme(&self.theme)
                    .with_prompt(message)
                    .items(options)
                    .defaults(&checked)
                    .interact()
                    .map_err(failed)?;
                Value::List(indices.into_iter().map(|i| options[i].clone()).collect())
            }
            PromptKind::Confirm => {
                let initial = matches!(default, Some(Value::Bool(true)));
                let answer = Confirm::with_theme(&self.theme)
                    .with_prompt(message)
                    .default(initial)
                    .interact()
                    .map_err(failed)?;
                Value::Bool(answer)
            }
        };

        Ok(value)
    }
}
