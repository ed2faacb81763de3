use goat_core::tools::ToolError;
use goat_memory::GoalError;
use thiserror::Error;

/// Everything a single command can fail with. None of these end the session.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Goal(#[from] GoalError),

    #[error("Malformed '{command}' command: {reason}. Usage: {usage}")]
    MalformedCommand {
        command: String,
        reason: String,
        usage: &'static str,
    },

    #[error("Tools are disabled in this configuration")]
    ToolsDisabled,
}
