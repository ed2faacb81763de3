//! # Goat Limbic System
//!
//! Fast, non-verbal state regulation for the agent. Rewards from learning
//! sessions flow into the [`MoodModel`]; reflections grow
//! [`Consciousness`]. Both are plain owned values with no background task:
//! the dispatcher that owns them is the only writer.

mod consciousness;
mod mood;

pub use consciousness::{Consciousness, Focus};
pub use mood::{Mood, MoodModel, MoodState, CURIOSITY_MAX, ENERGY_MAX};
