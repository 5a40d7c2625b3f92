//! Template engine for file contents and paths.
//!
//! Templates are parsed into a node tree once and rendered against a
//! [`Scope`](crate::expr::Scope). Actions are delimited by `{{` and `}}`:
//!
//! ```text
//! # {{ .ProjectName }}
//! {{ if "Go" in langs }}go_sdk.download(version = "1.22"){{ end }}
//! {{ range langs }}- {{ . }}
//! {{ else }}no languages selected
//! {{ end }}
//! {{/* comments render nothing */}}
//! ```
//!
//! `{{- ` trims whitespace before an action and ` -}}` trims whitespace after it.
//! Conditions use the same evaluator as feature rules.

mod lexer;
mod parser;
mod render;


use crate::expr::{Expr, ExpressionError, Scope};
use std::fmt;

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Text(String),
    Subst {
        expr: Expr,
        line: usize,
    },
    If {
        branches: Vec<(Expr, Vec<Node>)>,
        otherwise: Vec<Node>,
        line: usize,
    },
    Range {
        expr: Expr,
        body: Vec<Node>,
        otherwise: Vec<Node>,
        line: usize,
    },
}

impl Template {
    /// Parse template source.
    pub fn parse(src: &str) -> Result<Self, TemplateParseError> {
        let segments = lexer::segment(src)?;
        let nodes = parser::build(segments)?;
        Ok(Self { nodes })
    }

    /// Render against a scope.
    pub fn render(&self, scope: &Scope<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        render::render_nodes(&self.nodes, scope, &mut out)?;
        Ok(out)
    }

    /// Every name referenced by any action, in source order.
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_refs(&self.nodes, &mut names);
        names
    }
}

fn collect_refs<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Subst { expr, .. } => out.extend(expr.references()),
            Node::If {
                branches,
                otherwise,
                ..
            } => {
                for (cond, body) in branches {
                    out.extend(cond.references());
                    collect_refs(body, out);
                }
                collect_refs(otherwise, out);
            }
            Node::Range {
                expr,
                body,
                otherwise,
                ..
            } => {
                out.extend(expr.references());
                collect_refs(body, out);
                collect_refs(otherwise, out);
            }
        }
    }
}

/// Render a template source string in one step.
pub fn render_str(src: &str, scope: &Scope<'_>) -> Result<String, TemplateError> {
    let template = Template::parse(src)?;
    Ok(template.render(scope)?)
}

/// Syntax error in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParseError {
    /// 1-based line of the offending action.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for TemplateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for TemplateParseError {}

/// Failure while rendering a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An expression failed to evaluate.
    Expression { line: usize, source: ExpressionError },
    /// A list value was substituted outside of a `range` block.
    UnboundIteration { line: usize, name: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Expression { line, source } => write!(f, "line {}: {}", line, source),
            RenderError::UnboundIteration { line, name } => write!(
                f,
                "line {}: list value '{}' used outside of a range block",
                line, name
            ),
        }
    }
}

impl std::error::Error for RenderError {}

/// Either phase of [`render_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    Parse(TemplateParseError),
    Render(RenderError),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Parse(e) => write!(f, "{}", e),
            TemplateError::Render(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<TemplateParseError> for TemplateError {
    fn from(e: TemplateParseError) -> Self {
        TemplateError::Parse(e)
    }
}

impl From<RenderError> for TemplateError {
    fn from(e: RenderError) -> Self {
        TemplateError::Render(e)
    }
}
