//! Tool abstraction types, shared between the registry and the built-in tools.

use thiserror::Error;

/// Boxed source error carried by [`ToolError::Execution`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong when a tool is looked up or invoked.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// A handler failed (or panicked). The underlying failure is kept as the source.
    #[error("Tool '{tool}' failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    #[error("Cannot access '{path}': {reason}")]
    FileAccess { path: String, reason: String },

    #[error("Tool '{tool}' expects {expected} argument(s), got {got}")]
    InvalidArguments {
        tool: String,
        expected: usize,
        got: usize,
    },
}

impl ToolError {
    pub fn execution(tool: &str, source: impl Into<BoxError>) -> Self {
        ToolError::Execution {
            tool: tool.to_string(),
            source: source.into(),
        }
    }

    pub fn file_access(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ToolError::FileAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Trait for tool handlers that can be registered and dispatched.
///
/// Handlers take positional string arguments and return a display string.
/// They run synchronously; a handler that needs I/O must finish it before
/// returning.
pub trait ToolHandler: Send + Sync {
    /// Unique name used for dispatch.
    fn name(&self) -> &str;
    /// Human-readable description for help and logging.
    fn description(&self) -> &str;
    /// Execute the tool with positional arguments.
    fn execute(&self, args: &[String]) -> Result<String, ToolError>;
}

/// Fail with `InvalidArguments` unless exactly `expected` arguments were passed.
pub fn expect_args(tool: &str, args: &[String], expected: usize) -> Result<(), ToolError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ToolError::InvalidArguments {
            tool: tool.to_string(),
            expected,
            got: args.len(),
        })
    }
}
