pub mod calc;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod learning;
pub mod prompts;
pub mod sandbox;
pub mod tool_registry;
pub mod tools;

pub use command::Command;
pub use dispatcher::{Dispatcher, Reply};
pub use error::DispatchError;
pub use learning::Discipline;
pub use sandbox::{ArithmeticSandbox, CodeRunner, DisabledRunner, SandboxError};
pub use tool_registry::ToolRegistry;
