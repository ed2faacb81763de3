//! Shared building blocks for the Thinker-Goat agent: configuration,
//! file-access policy and the tool contract.

pub mod config;
pub mod safety;
pub mod tools;

pub use config::{CapabilityTier, GoatConfig, SafetyConfig, VoiceEngine};
pub use safety::{CapabilityGuard, SafetyDenied};
pub use tools::{expect_args, BoxError, ToolError, ToolHandler};
