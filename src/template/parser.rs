//! Builds the node tree from lexed segments.

use super::lexer::Segment;
use super::{Node, TemplateParseError};
use crate::expr::{self, Expr};
use std::vec::IntoIter;

/// What ended a run of nodes.
enum Stop {
    Eof,
    End(usize),
    Else(usize),
    ElseIf(Expr, usize),
}

enum Action {
    Subst(Expr),
    If(Expr),
    ElseIf(Expr),
    Else,
    End,
    Range(Expr),
}

pub(super) fn build(segments: Vec<Segment>) -> Result<Vec<Node>, TemplateParseError> {
    let mut iter = segments.into_iter();
    let (nodes, stop) = parse_nodes(&mut iter)?;

    match stop {
        Stop::Eof => Ok(nodes),
        Stop::End(line) => Err(unexpected(line, "{{ end }}")),
        Stop::Else(line) => Err(unexpected(line, "{{ else }}")),
        Stop::ElseIf(_, line) => Err(unexpected(line, "{{ else if }}")),
    }
}

fn parse_nodes(iter: &mut IntoIter<Segment>) -> Result<(Vec<Node>, Stop), TemplateParseError> {
    let mut nodes = Vec::new();

    while let Some(segment) = iter.next() {
        let (src, line) = match segment {
            Segment::Text(text) => {
                nodes.push(Node::Text(text));
                continue;
            }
            Segment::Action { src, line } => (src, line),
        };

        match classify(&src, line)? {
            Action::Subst(expr) => nodes.push(Node::Subst { expr, line }),
            Action::If(cond) => nodes.push(parse_if(iter, cond, line)?),
            Action::Range(expr) => nodes.push(parse_range(iter, expr, line)?),
            Action::ElseIf(cond) => return Ok((nodes, Stop::ElseIf(cond, line))),
            Action::Else => return Ok((nodes, Stop::Else(line))),
            Action::End => return Ok((nodes, Stop::End(line))),
        }
    }

    Ok((nodes, Stop::Eof))
}

fn parse_if(
    iter: &mut IntoIter<Segment>,
    first: Expr,
    line: usize,
) -> Result<Node, TemplateParseError> {
    let mut branches = Vec::new();
    let mut cond = first;

    loop {
        let (body, stop) = parse_nodes(iter)?;
        branches.push((cond, body));

        match stop {
            Stop::End(_) => {
                return Ok(Node::If {
                    branches,
                    otherwise: Vec::new(),
                    line,
                });
            }
            Stop::ElseIf(next, _) => cond = next,
            Stop::Else(_) => {
                let otherwise = parse_else_tail(iter, "if", line)?;
                return Ok(Node::If {
                    branches,
                    otherwise,
                    line,
                });
            }
            Stop::Eof => return Err(missing_end("if", line)),
        }
    }
}

fn parse_range(
    iter: &mut IntoIter<Segment>,
    expr: Expr,
    line: usize,
) -> Result<Node, TemplateParseError> {
    let (body, stop) = parse_nodes(iter)?;

    let otherwise = match stop {
        Stop::End(_) => Vec::new(),
        Stop::Else(_) => parse_else_tail(iter, "range", line)?,
        Stop::ElseIf(_, else_line) => {
            return Err(TemplateParseError {
                line: else_line,
                message: "{{ else if }} is not allowed inside {{ range }}".to_string(),
            });
        }
        Stop::Eof => return Err(missing_end("range", line)),
    };

    Ok(Node::Range {
        expr,
        body,
        otherwise,
        line,
    })
}

/// Parse the nodes after an `else` up to the closing `end`.
fn parse_else_tail(
    iter: &mut IntoIter<Segment>,
    block: &str,
    line: usize,
) -> Result<Vec<Node>, TemplateParseError> {
    let (otherwise, stop) = parse_nodes(iter)?;
    match stop {
        Stop::End(_) => Ok(otherwise),
        Stop::Else(else_line) | Stop::ElseIf(_, else_line) => Err(TemplateParseError {
            line: else_line,
            message: format!("{{{{ else }}}} after the final {{{{ else }}}} of {} block", block),
        }),
        Stop::Eof => Err(missing_end(block, line)),
    }
}

fn classify(src: &str, line: usize) -> Result<Action, TemplateParseError> {
    if src.is_empty() {
        return Err(TemplateParseError {
            line,
            message: "empty action".to_string(),
        });
    }

    let (keyword, rest) = match src.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (src, ""),
    };

    let action = match keyword {
        "if" => Action::If(parse_expr(rest, line)?),
        "range" => Action::Range(parse_expr(rest, line)?),
        "end" if rest.is_empty() => Action::End,
        "else" if rest.is_empty() => Action::Else,
        "else" => match rest.split_once(char::is_whitespace) {
            Some(("if", cond)) => Action::ElseIf(parse_expr(cond.trim(), line)?),
            _ => {
                return Err(TemplateParseError {
                    line,
                    message: format!("expected 'else' or 'else if <expr>', found '{}'", src),
                });
            }
        },
        "end" => {
            return Err(TemplateParseError {
                line,
                message: format!("unexpected text after 'end': '{}'", rest),
            });
        }
        _ => Action::Subst(parse_expr(src, line)?),
    };

    Ok(action)
}

fn parse_expr(src: &str, line: usize) -> Result<Expr, TemplateParseError> {
    expr::parse(src).map_err(|e| TemplateParseError {
        line,
        message: format!("invalid expression '{}': {}", src, e),
    })
}

fn unexpected(line: usize, what: &str) -> TemplateParseError {
    TemplateParseError {
        line,
        message: format!("unexpected {} without a matching block", what),
    }
}

fn missing_end(block: &str, line: usize) -> TemplateParseError {
    TemplateParseError {
        line,
        message: format!("missing {{{{ end }}}} for {} block opened here", block),
    }
}
