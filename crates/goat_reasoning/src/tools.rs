//! Built-in tools.
//!
//! None of these hand user text to a shell or a host evaluator. File access
//! goes through the [`CapabilityGuard`], code runs through a [`CodeRunner`].

use crate::calc::{self, CalcError};
use crate::sandbox::{CodeRunner, SandboxError};
use crate::tool_registry::ToolRegistry;
use goat_core::safety::CapabilityGuard;
use goat_core::tools::{expect_args, ToolError, ToolHandler};
use std::path::Path;
use std::sync::Arc;

pub const WEB_SEARCH: &str = "web_search";
pub const CALCULATE: &str = "calculate";
pub const WRITE_FILE: &str = "write_file";
pub const READ_FILE: &str = "read_file";
pub const RUN_CODE: &str = "run_code";

// ============================================================================
// web_search
// ============================================================================

/// Placeholder search. Performs no network I/O.
pub struct WebSearchTool;

impl ToolHandler for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH
    }

    fn description(&self) -> &str {
        "Search the web (simulated)"
    }

    fn execute(&self, args: &[String]) -> Result<String, ToolError> {
        expect_args(WEB_SEARCH, args, 1)?;
        let query = args[0].trim();
        Ok(format!(
            "[SIMULATED SEARCH] Results for: {q}\n- Result 1: Information about {q}\n- Result 2: More details about {q}",
            q = query
        ))
    }
}

// ============================================================================
// calculate
// ============================================================================

pub struct CalculateTool;

impl ToolHandler for CalculateTool {
    fn name(&self) -> &str {
        CALCULATE
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression"
    }

    fn execute(&self, args: &[String]) -> Result<String, ToolError> {
        expect_args(CALCULATE, args, 1)?;
        let expression = args[0].trim();
        let value = calc::evaluate(expression).map_err(|e: CalcError| {
            ToolError::InvalidExpression(format!("'{}': {}", expression, e))
        })?;
        Ok(format!(
            "Calculation: {} = {}",
            expression,
            calc::format_number(value)
        ))
    }
}

// ============================================================================
// write_file / read_file
// ============================================================================

pub struct WriteFileTool {
    guard: Arc<CapabilityGuard>,
}

impl WriteFileTool {
    pub fn new(guard: Arc<CapabilityGuard>) -> Self {
        Self { guard }
    }
}

impl ToolHandler for WriteFileTool {
    fn name(&self) -> &str {
        WRITE_FILE
    }

    fn description(&self) -> &str {
        "Write text to a file"
    }

    fn execute(&self, args: &[String]) -> Result<String, ToolError> {
        expect_args(WRITE_FILE, args, 2)?;
        let (name, content) = (&args[0], &args[1]);
        let path = Path::new(name);

        self.guard
            .check_write(path)
            .map_err(|e| ToolError::file_access(name.as_str(), e))?;
        std::fs::write(path, content).map_err(|e| ToolError::file_access(name.as_str(), e))?;

        tracing::info!(path = %name, bytes = content.len(), "file written");
        Ok(format!("Successfully wrote to {}", name))
    }
}

pub struct ReadFileTool {
    guard: Arc<CapabilityGuard>,
}

impl ReadFileTool {
    pub fn new(guard: Arc<CapabilityGuard>) -> Self {
        Self { guard }
    }
}

impl ToolHandler for ReadFileTool {
    fn name(&self) -> &str {
        READ_FILE
    }

    fn description(&self) -> &str {
        "Read a text file"
    }

    fn execute(&self, args: &[String]) -> Result<String, ToolError> {
        expect_args(READ_FILE, args, 1)?;
        let name = args[0].trim();
        let path = Path::new(name);

        self.guard
            .check_read(path)
            .map_err(|e| ToolError::file_access(name, e))?;
        let content = std::fs::read_to_string(path).map_err(|e| ToolError::file_access(name, e))?;

        Ok(format!(
            "File content from {}:\n{}",
            name,
            truncate(&content, self.guard.max_read_bytes())
        ))
    }
}

/// Cut `text` to at most `max` bytes on a char boundary.
fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...\n[truncated, {} bytes total]", &text[..end], text.len())
}

// ============================================================================
// run_code
// ============================================================================

pub struct RunCodeTool {
    runner: Box<dyn CodeRunner>,
}

impl RunCodeTool {
    pub fn new(runner: Box<dyn CodeRunner>) -> Self {
        Self { runner }
    }
}

impl ToolHandler for RunCodeTool {
    fn name(&self) -> &str {
        RUN_CODE
    }

    fn description(&self) -> &str {
        "Run a snippet in the code sandbox"
    }

    fn execute(&self, args: &[String]) -> Result<String, ToolError> {
        expect_args(RUN_CODE, args, 1)?;
        tracing::debug!(runner = self.runner.name(), "running code");
        self.runner.run(&args[0]).map_err(|e: SandboxError| {
            if matches!(e, SandboxError::Calc { .. }) {
                ToolError::InvalidExpression(e.to_string())
            } else {
                ToolError::execution(RUN_CODE, e)
            }
        })
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Register every built-in tool.
pub fn register_builtins(
    registry: &mut ToolRegistry,
    guard: Arc<CapabilityGuard>,
    runner: Box<dyn CodeRunner>,
) -> Result<(), ToolError> {
    registry.register(Box::new(WebSearchTool))?;
    registry.register(Box::new(CalculateTool))?;
    registry.register(Box::new(WriteFileTool::new(guard.clone())))?;
    registry.register(Box::new(ReadFileTool::new(guard)))?;
    registry.register(Box::new(RunCodeTool::new(runner)))?;
    Ok(())
}
