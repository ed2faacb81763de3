//! Arithmetic expression parser.
//!
//! A small recursive-descent parser over a fixed grammar. Nothing here ever
//! hands text to a host evaluator; anything outside the grammar is rejected
//! before a single operation runs.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | ident | '(' expr ')'
//! ```
//!
//! Identifiers are only recognised in [`Grammar::Script`], which the code
//! sandbox uses for variables.

use std::collections::HashMap;
use thiserror::Error;

/// Maximum nesting of parentheses / unary operators.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected '{found}'")]
    UnexpectedToken { found: String },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("empty expression")]
    Empty,
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NonFinite,
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("expression nested too deeply")]
    TooDeep,
}

/// Which tokens the lexer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// Numeric literals, `+ - * / ( )` and whitespace only.
    Arithmetic,
    /// Arithmetic plus identifiers and `=`.
    Script,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Assign,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(n) => n.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Assign => "=".into(),
        }
    }
}

pub(crate) fn tokenize(src: &str, grammar: Grammar) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '=' if grammar == Grammar::Script => {
                tokens.push(Token::Assign);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(text.clone()))?;
                tokens.push(Token::Num(value));
            }
            c if grammar == Grammar::Script && (c.is_ascii_alphabetic() || c == '_') => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            c => return Err(CalcError::UnexpectedChar { ch: c, pos: i }),
        }
    }

    Ok(tokens)
}

// ============================================================================
// Parser / evaluator
// ============================================================================

pub(crate) struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    vars: &'a HashMap<String, f64>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token], vars: &'a HashMap<String, f64>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            vars,
        }
    }

    /// Evaluate the whole token stream as one expression.
    pub(crate) fn evaluate(mut self) -> Result<f64, CalcError> {
        if self.tokens.is_empty() {
            return Err(CalcError::Empty);
        }
        let value = self.expr()?;
        if let Some(tok) = self.peek() {
            return Err(CalcError::UnexpectedToken {
                found: tok.describe(),
            });
        }
        finite(value)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc -= self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    acc /= rhs;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        self.descend()?;
        let value = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.unary().map(|v| -v)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        };
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.advance().cloned() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Ident(name)) => self
                .vars
                .get(&name)
                .copied()
                .ok_or(CalcError::UnknownVariable(name)),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    Some(tok) => Err(CalcError::UnexpectedToken {
                        found: tok.describe(),
                    }),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(tok) => Err(CalcError::UnexpectedToken {
                found: tok.describe(),
            }),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        Ok(())
    }
}

fn finite(v: f64) -> Result<f64, CalcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CalcError::NonFinite)
    }
}

/// Evaluate a pure arithmetic expression.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression, Grammar::Arithmetic)?;
    let vars = HashMap::new();
    Parser::new(&tokens, &vars).evaluate()
}

/// Render a result the way a person would write it: `8`, not `8.0`.
pub fn format_number(v: f64) -> String {
    // Avoid printing "-0"
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{}", v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2+2*3").unwrap(), 8.0);
        assert_eq!(evaluate("(2+2)*3").unwrap(), 12.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("8 / 4 / 2").unwrap(), 1.0);
    }

    #[test]
    fn test_unary_and_decimals() {
        assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
        assert_eq!(evaluate("--2").unwrap(), 2.0);
        assert_eq!(evaluate("1.5 * .5").unwrap(), 0.75);
        assert_eq!(evaluate("-(1+1)").unwrap(), -2.0);
    }

    #[test]
    fn test_rejects_identifiers() {
        assert_eq!(
            evaluate("import os"),
            Err(CalcError::UnexpectedChar { ch: 'i', pos: 0 })
        );
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("2 ** 3").is_err());
        assert!(evaluate("1; 2").is_err());
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(evaluate(""), Err(CalcError::Empty));
        assert_eq!(evaluate("   "), Err(CalcError::Empty));
        assert_eq!(evaluate("(1+2"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("1+"), Err(CalcError::UnexpectedEnd));
        assert!(matches!(evaluate("1 2"), Err(CalcError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("1..2"), Err(CalcError::InvalidNumber(_))));
        assert!(matches!(evaluate(")"), Err(CalcError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1/0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_overflow_is_non_finite() {
        let huge = format!("{}*{}", "9".repeat(200), "9".repeat(200));
        assert_eq!(evaluate(&huge), Err(CalcError::NonFinite));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        assert_eq!(evaluate(&deep), Err(CalcError::TooDeep));
        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&ok).unwrap(), 1.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.75), "0.75");
    }
}
