pub mod goals;
pub mod store;

pub use goals::{Goal, GoalError, GoalTracker, ProgressUpdate};
pub use store::{MemoryRecord, MemoryStore, ScoredRecord};
