//! Code execution seam for the `run_code` tool.
//!
//! The default runner is a tiny interpreter over the calculator grammar
//! plus variables. It has no I/O and no imports, and it never calls out to
//! a host evaluator. Anything richer belongs behind [`CodeRunner`].

use crate::calc::{tokenize, CalcError, Grammar, Parser, Token};
use std::collections::HashMap;
use thiserror::Error;

pub const MAX_SOURCE_LEN: usize = 4096;
pub const MAX_STATEMENTS: usize = 256;
pub const MAX_VARIABLES: usize = 64;

/// Output when the program ends without a bare expression.
pub const NO_VALUE_OUTPUT: &str = "Code executed successfully";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SandboxError {
    #[error("code execution is disabled")]
    Disabled,
    #[error("source exceeds {} bytes", MAX_SOURCE_LEN)]
    SourceTooLong,
    #[error("more than {} statements", MAX_STATEMENTS)]
    TooManyStatements,
    #[error("more than {} variables", MAX_VARIABLES)]
    TooManyVariables,
    #[error("statement {statement}: {source}")]
    Calc {
        statement: usize,
        #[source]
        source: CalcError,
    },
}

/// Runs a snippet of user code and returns its printable result.
pub trait CodeRunner: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self, source: &str) -> Result<String, SandboxError>;
}

// ============================================================================
// ArithmeticSandbox
// ============================================================================

/// `;`/newline separated statements, each `name = expr` or a bare `expr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticSandbox;

impl ArithmeticSandbox {
    pub fn new() -> Self {
        Self
    }
}

impl CodeRunner for ArithmeticSandbox {
    fn name(&self) -> &str {
        "arithmetic"
    }

    fn run(&self, source: &str) -> Result<String, SandboxError> {
        if source.len() > MAX_SOURCE_LEN {
            return Err(SandboxError::SourceTooLong);
        }

        let statements: Vec<&str> = source
            .split(|c: char| c == ';' || c == '\n')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if statements.len() > MAX_STATEMENTS {
            return Err(SandboxError::TooManyStatements);
        }

        let mut vars: HashMap<String, f64> = HashMap::new();
        let mut last = None;

        for (idx, stmt) in statements.iter().enumerate() {
            let statement = idx + 1;
            let calc = |source| SandboxError::Calc { statement, source };
            let tokens = tokenize(stmt, Grammar::Script).map_err(calc)?;

            match tokens.as_slice() {
                [Token::Ident(name), Token::Assign, rest @ ..] => {
                    let value = Parser::new(rest, &vars).evaluate().map_err(calc)?;
                    if !vars.contains_key(name) && vars.len() >= MAX_VARIABLES {
                        return Err(SandboxError::TooManyVariables);
                    }
                    vars.insert(name.clone(), value);
                    last = None;
                }
                _ => {
                    let value = Parser::new(&tokens, &vars).evaluate().map_err(calc)?;
                    last = Some(value);
                }
            }
        }

        tracing::debug!(statements = statements.len(), vars = vars.len(), "sandbox run");
        Ok(last
            .map(crate::calc::format_number)
            .unwrap_or_else(|| NO_VALUE_OUTPUT.to_string()))
    }
}

// ============================================================================
// DisabledRunner
// ============================================================================

/// Refuses every snippet.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledRunner;

impl CodeRunner for DisabledRunner {
    fn name(&self) -> &str {
        "disabled"
    }

    fn run(&self, _source: &str) -> Result<String, SandboxError> {
        Err(SandboxError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Result<String, SandboxError> {
        ArithmeticSandbox::new().run(src)
    }

    #[test]
    fn test_last_expression_is_output() {
        assert_eq!(run("x = 2; y = x * 3; y + 1").unwrap(), "7");
        assert_eq!(run("1 + 1\n2 * 5").unwrap(), "10");
    }

    #[test]
    fn test_assignment_only_program() {
        assert_eq!(run("x = 1; y = 2").unwrap(), NO_VALUE_OUTPUT);
        assert_eq!(run("").unwrap(), NO_VALUE_OUTPUT);
    }

    #[test]
    fn test_reassignment() {
        assert_eq!(run("x = 1; x = x + 1; x").unwrap(), "2");
    }

    #[test]
    fn test_rejects_host_code() {
        assert_eq!(
            run("import os"),
            Err(SandboxError::Calc {
                statement: 1,
                source: CalcError::UnknownVariable("import".into())
            })
        );
        assert!(matches!(
            run("print('hi')"),
            Err(SandboxError::Calc {
                source: CalcError::UnexpectedChar { ch: '\'', .. },
                ..
            })
        ));
        assert!(run("open(\"/etc/passwd\")").is_err());
    }

    #[test]
    fn test_unknown_variable_reports_statement() {
        assert_eq!(
            run("a = 1; b + a"),
            Err(SandboxError::Calc {
                statement: 2,
                source: CalcError::UnknownVariable("b".into())
            })
        );
    }

    #[test]
    fn test_limits() {
        assert_eq!(run(&"1;".repeat(MAX_SOURCE_LEN)), Err(SandboxError::SourceTooLong));
        assert_eq!(
            run(&"1;".repeat(MAX_STATEMENTS + 1)),
            Err(SandboxError::TooManyStatements)
        );
        let many: Vec<String> = (0..=MAX_VARIABLES).map(|i| format!("v{} = {}", i, i)).collect();
        assert_eq!(run(&many.join(";")), Err(SandboxError::TooManyVariables));
    }

    #[test]
    fn test_disabled_runner() {
        assert_eq!(DisabledRunner.run("1"), Err(SandboxError::Disabled));
    }
}
