//! Error types for the scaffold CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Every fatal variant names the question, flag, path, or expression at fault.

use crate::exit_codes;
use crate::expr::ExpressionError;
use crate::generate::WriteFailure;
use crate::template::{RenderError, TemplateParseError};
use thiserror::Error;

/// Main error type for scaffold operations.
///
/// Validation-class variants abort a run before anything is written and map to
/// exit code 2. Write-class variants are reported after every file has been
/// attempted and map to exit code 1.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Bad invocation or unreadable input (missing source dir, unknown preset).
    #[error("{0}")]
    UserError(String),

    /// Static analysis of `scaffold.yaml` failed.
    #[error("invalid configuration at '{name}': {reason}")]
    ConfigValidation { name: String, reason: String },

    /// A required question has no bound answer at render time.
    #[error("missing answer for required question '{0}'")]
    MissingAnswer(String),

    /// An answer violates its question's options or validation rule.
    #[error("invalid answer for '{name}': {reason}")]
    InvalidAnswer { name: String, reason: String },

    /// An expression failed to evaluate (usually an undefined name).
    #[error("expression error in {context}: {source}")]
    Expression {
        context: String,
        #[source]
        source: ExpressionError,
    },

    /// A list-valued answer was substituted outside of a `range` block.
    #[error("{path}: list value '{name}' used outside of a range block")]
    UnboundIteration { path: String, name: String },

    /// A template file or path could not be parsed.
    #[error("{path}:{line}: {reason}")]
    Template {
        path: String,
        line: usize,
        reason: String,
    },

    /// One or more output files could not be written.
    #[error("{}", format_write_failures(.0))]
    WriteFailed(Vec<WriteFailure>),

    /// One or more post-generation hooks failed.
    #[error("{} post hook(s) failed:\n{}", .0.len(), .0.join("\n"))]
    HookFailed(Vec<String>),
}

impl ScaffoldError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::WriteFailed(_) | ScaffoldError::HookFailed(_) => {
                exit_codes::WRITE_FAILURE
            }
            ScaffoldError::UserError(_)
            | ScaffoldError::ConfigValidation { .. }
            | ScaffoldError::MissingAnswer(_)
            | ScaffoldError::InvalidAnswer { .. }
            | ScaffoldError::Expression { .. }
            | ScaffoldError::UnboundIteration { .. }
            | ScaffoldError::Template { .. } => exit_codes::VALIDATION_FAILURE,
        }
    }

    /// Shorthand for a [`ScaffoldError::ConfigValidation`].
    pub fn config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ScaffoldError::ConfigValidation {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`ScaffoldError::Expression`].
    pub fn expression(context: impl Into<String>, source: ExpressionError) -> Self {
        ScaffoldError::Expression {
            context: context.into(),
            source,
        }
    }

    /// Attach the template path to a template syntax error.
    pub fn template(path: impl Into<String>, err: TemplateParseError) -> Self {
        ScaffoldError::Template {
            path: path.into(),
            line: err.line,
            reason: err.message,
        }
    }

    /// Attach the template path to a render failure.
    pub fn render(path: impl Into<String>, err: RenderError) -> Self {
        let path = path.into();
        match err {
            RenderError::Expression { line, source } => ScaffoldError::Expression {
                context: format!("{}:{}", path, line),
                source,
            },
            RenderError::UnboundIteration { line, name } => ScaffoldError::UnboundIteration {
                path: format!("{}:{}", path, line),
                name,
            },
        }
    }
}

fn format_write_failures(failures: &[WriteFailure]) -> String {
    let mut msg = format!("failed to write {} file(s):", failures.len());
    for failure in failures {
        msg.push_str(&format!("\n  x {}  ({})", failure.path.display(), failure.reason));
    }
    msg
}

/// Result type alias for scaffold operations.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
