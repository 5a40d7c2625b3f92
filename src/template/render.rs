//! Node tree rendering.

use super::{Node, RenderError};
use crate::expr::{self, ExpressionError, Scope, Value};

pub(super) fn render_nodes(
    nodes: &[Node],
    scope: &Scope<'_>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Subst { expr, line } => {
                let value = expr::eval(expr, scope).map_err(|source| RenderError::Expression {
                    line: *line,
                    source,
                })?;
                match value.as_scalar() {
                    Some(s) => out.push_str(&s),
                    None => {
                        return Err(RenderError::UnboundIteration {
                            line: *line,
                            name: expr.to_string(),
                        });
                    }
                }
            }
            Node::If {
                branches,
                otherwise,
                line,
            } => {
                let mut taken = None;
                for (cond, body) in branches {
                    let hit = expr::eval_bool(cond, scope).map_err(|source| {
                        RenderError::Expression {
                            line: *line,
                            source,
                        }
                    })?;
                    if hit {
                        taken = Some(body);
                        break;
                    }
                }
                render_nodes(taken.unwrap_or(otherwise), scope, out)?;
            }
            Node::Range {
                expr,
                body,
                otherwise,
                line,
            } => {
                let value = expr::eval(expr, scope).map_err(|source| RenderError::Expression {
                    line: *line,
                    source,
                })?;
                let items = match value {
                    Value::List(items) => items,
                    other => {
                        return Err(RenderError::Expression {
                            line: *line,
                            source: ExpressionError::NotIterable {
                                name: expr.to_string(),
                                found: other.kind(),
                            },
                        });
                    }
                };

                if items.is_empty() {
                    render_nodes(otherwise, scope, out)?;
                }
                for item in &items {
                    render_nodes(body, &scope.with_dot(item), out)?;
                }
            }
        }
    }

    Ok(())
}
