use goat_core::tools::{BoxError, ToolError, ToolHandler};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

// ============================================================================
// Closure-backed tools
// ============================================================================

type ToolFn = dyn Fn(&[String]) -> Result<String, ToolError> + Send + Sync;

/// A tool built from a plain function, see [`ToolRegistry::register_fn`].
struct FnTool {
    name: String,
    description: String,
    func: Box<ToolFn>,
}

impl ToolHandler for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&self, args: &[String]) -> Result<String, ToolError> {
        (self.func)(args)
    }
}

// ============================================================================
// ToolRegistry
// ============================================================================

#[derive(Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler. Fails if the name is already taken.
    pub fn register(&mut self, handler: Box<dyn ToolHandler>) -> Result<(), ToolError> {
        let name = handler.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(ToolError::DuplicateTool(name));
        }
        tracing::debug!("Registered tool: {}", name);
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Register a closure as a tool.
    pub fn register_fn<F>(&mut self, name: &str, description: &str, func: F) -> Result<(), ToolError>
    where
        F: Fn(&[String]) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register(Box::new(FnTool {
            name: name.to_string(),
            description: description.to_string(),
            func: Box::new(func),
        }))
    }

    /// Look up a tool and run it. A panicking handler is reported as
    /// [`ToolError::Execution`].
    pub fn invoke(&self, name: &str, args: &[String]) -> Result<String, ToolError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tracing::debug!(tool = name, args = args.len(), "invoking tool");
        match catch_unwind(AssertUnwindSafe(|| handler.execute(args))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(tool = name, "tool panicked: {}", message);
                Err(ToolError::execution(name, BoxError::from(format!("panicked: {}", message))))
            }
        }
    }

    /// `(name, description)` pairs, ordered by name.
    pub fn tools(&self) -> Vec<(&str, &str)> {
        self.handlers
            .values()
            .map(|h| (h.name(), h.description()))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
