//! Tokenizer for the expression language.

use super::ExprParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    LParen,
    RParen,
    Not,
    And,
    Or,
    In,
    EqEq,
    NotEq,
    True,
    False,
    Dot,
    Name(String),
    Str(String),
}

/// A token with its 1-based starting column.
pub(super) type Spanned = (Token, usize);

pub(super) fn tokenize(src: &str) -> Result<Vec<Spanned>, ExprParseError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let column = i + 1;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                tokens.push((Token::LParen, column));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, column));
                i += 1;
            }
            '!' if chars.get(i + 1) == Some(&'=') => {
                tokens.push((Token::NotEq, column));
                i += 2;
            }
            '!' => {
                tokens.push((Token::Not, column));
                i += 1;
            }
            '=' if chars.get(i + 1) == Some(&'=') => {
                tokens.push((Token::EqEq, column));
                i += 2;
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                tokens.push((Token::And, column));
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                tokens.push((Token::Or, column));
                i += 2;
            }
            '"' | '\'' => {
                let (value, next) = lex_string(&chars, i)?;
                tokens.push((Token::Str(value), column));
                i = next;
            }
            '.' => {
                if chars.get(i + 1).is_some_and(|&n| is_ident_start(n)) {
                    let (name, next) = lex_name(&chars, i + 1);
                    tokens.push((Token::Name(name), column));
                    i = next;
                } else {
                    tokens.push((Token::Dot, column));
                    i += 1;
                }
            }
            c if is_ident_start(c) => {
                let (name, next) = lex_name(&chars, i);
                let token = match name.as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "in" => Token::In,
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Name(name),
                };
                tokens.push((token, column));
                i = next;
            }
            other => {
                return Err(ExprParseError {
                    column,
                    message: format!("unexpected character '{}'", other),
                });
            }
        }
    }

    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lex a dotted name (`a.b.c`) starting at `start`. A trailing dot is not consumed.
fn lex_name(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    let mut name = String::new();

    loop {
        while i < chars.len() && is_ident_char(chars[i]) {
            name.push(chars[i]);
            i += 1;
        }
        if i + 1 < chars.len() && chars[i] == '.' && is_ident_start(chars[i + 1]) {
            name.push('.');
            i += 1;
        } else {
            break;
        }
    }

    (name, i)
}

fn lex_string(chars: &[char], start: usize) -> Result<(String, usize), ExprParseError> {
    let quote = chars[start];
    let mut value = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let escaped = chars.get(i + 1).ok_or_else(|| ExprParseError {
                    column: i + 1,
                    message: "unterminated escape sequence".to_string(),
                })?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => *other,
                });
                i += 2;
            }
            c if c == quote => return Ok((value, i + 1)),
            c => {
                value.push(c);
                i += 1;
            }
        }
    }

    Err(ExprParseError {
        column: start + 1,
        message: "unterminated string literal".to_string(),
    })
}
