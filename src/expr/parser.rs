//! Recursive-descent parser producing [`Expr`] trees.

use super::lexer::{Spanned, Token, tokenize};
use super::{Expr, ExprParseError, Value};

/// Namespaces accepted for compatibility with upstream templates
/// (`.Scaffold.langs`, `.Computed.go`); they resolve to the bare name.
const NAMESPACES: &[&str] = &["Scaffold.", "Computed."];

/// Parse an expression.
///
/// ```text
/// "Go" in langs and not .minimal
/// ```
pub fn parse(src: &str) -> Result<Expr, ExprParseError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(ExprParseError {
            column: 1,
            message: "empty expression".to_string(),
        });
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end_column: src.chars().count() + 1,
    };
    let expr = parser.parse_or()?;

    if let Some((token, column)) = parser.peek_spanned() {
        return Err(ExprParseError {
            column,
            message: format!("unexpected {} after expression", describe(token)),
        });
    }

    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end_column: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_spanned(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.pos).map(|(t, c)| (t, *c))
    }

    fn advance(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ExprParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprParseError> {
        let mut left = self.parse_unary()?;
        while self.eat(&Token::And) {
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprParseError> {
        if self.eat(&Token::Not) {
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> Result<Expr, ExprParseError> {
        let left = self.parse_primary()?;

        let expr = if self.eat(&Token::In) {
            let right = self.parse_primary()?;
            Expr::Contains {
                needle: Box::new(left),
                haystack: Box::new(right),
            }
        } else if self.eat(&Token::EqEq) {
            Expr::Eq(Box::new(left), Box::new(self.parse_primary()?))
        } else if self.eat(&Token::NotEq) {
            Expr::Ne(Box::new(left), Box::new(self.parse_primary()?))
        } else {
            left
        };

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprParseError> {
        let Some((token, column)) = self.advance() else {
            return Err(ExprParseError {
                column: self.end_column,
                message: "unexpected end of expression".to_string(),
            });
        };

        match token {
            Token::True => Ok(Expr::Literal(Value::Bool(true))),
            Token::False => Ok(Expr::Literal(Value::Bool(false))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::Dot => Ok(Expr::Dot),
            Token::Name(name) => Ok(Expr::Ref(canonical_name(&name).to_string())),
            Token::LParen => {
                let inner = self.parse_or()?;
                if !self.eat(&Token::RParen) {
                    let column = self
                        .peek_spanned()
                        .map(|(_, c)| c)
                        .unwrap_or(self.end_column);
                    return Err(ExprParseError {
                        column,
                        message: "expected ')'".to_string(),
                    });
                }
                Ok(inner)
            }
            other => Err(ExprParseError {
                column,
                message: format!("unexpected {}", describe(&other)),
            }),
        }
    }
}

/// Strip an upstream namespace prefix from a referenced name.
pub(crate) fn canonical_name(name: &str) -> &str {
    NAMESPACES
        .iter()
        .find_map(|ns| name.strip_prefix(ns))
        .unwrap_or(name)
}

fn describe(token: &Token) -> String {
    match token {
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Not => "'not'".to_string(),
        Token::And => "'and'".to_string(),
        Token::Or => "'or'".to_string(),
        Token::In => "'in'".to_string(),
        Token::EqEq => "'=='".to_string(),
        Token::NotEq => "'!='".to_string(),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Name(name) => format!("name '{}'", name),
        Token::Str(s) => format!("string {:?}", s),
    }
}
