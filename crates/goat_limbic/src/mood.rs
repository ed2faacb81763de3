//! Mood model
//!
//! Two bounded scalars (energy, curiosity) nudged by reward signals. The
//! mood label is never stored; it is classified from the current state on
//! demand.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ENERGY_MAX: f64 = 100.0;
pub const CURIOSITY_MAX: f64 = 1.0;

/// Raw affective state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodState {
    /// 0.0 to 100.0
    pub energy: f64,
    /// 0.0 to 1.0
    pub curiosity: f64,
}

impl Default for MoodState {
    fn default() -> Self {
        Self {
            energy: 75.0,
            curiosity: 0.6,
        }
    }
}

impl MoodState {
    pub fn new(energy: f64, curiosity: f64) -> Self {
        Self {
            energy: sanitize(energy, 75.0).clamp(0.0, ENERGY_MAX),
            curiosity: sanitize(curiosity, 0.6).clamp(0.0, CURIOSITY_MAX),
        }
    }
}

/// Discrete mood label derived from [`MoodState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energetic,
    Curious,
    Tired,
    Calm,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "energetic",
            Mood::Curious => "curious",
            Mood::Tired => "tired",
            Mood::Calm => "calm",
        }
    }

    /// Ordered threshold rules; the first match wins.
    pub fn classify(state: &MoodState) -> Self {
        if state.energy > 80.0 {
            Mood::Energetic
        } else if state.curiosity > 0.7 {
            Mood::Curious
        } else if state.energy < 30.0 {
            Mood::Tired
        } else {
            Mood::Calm
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoodModel {
    state: MoodState,
}

impl MoodModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MoodState) -> Self {
        Self {
            state: MoodState::new(state.energy, state.curiosity),
        }
    }

    /// Apply a reward signal. Positive rewards raise energy and curiosity,
    /// negative ones lower them; both stay clamped.
    pub fn react(&mut self, reward: f64) {
        if !reward.is_finite() {
            tracing::warn!("Ignoring non-finite reward {}", reward);
            return;
        }
        self.state.energy = (self.state.energy + 2.0 * reward).clamp(0.0, ENERGY_MAX);
        self.state.curiosity = (self.state.curiosity + 0.1 * reward).clamp(0.0, CURIOSITY_MAX);
        tracing::debug!(
            reward,
            energy = self.state.energy,
            curiosity = self.state.curiosity,
            "mood reacted"
        );
    }

    pub fn current_mood(&self) -> Mood {
        Mood::classify(&self.state)
    }

    pub fn state(&self) -> MoodState {
        self.state
    }
}

#[inline]
fn sanitize(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}
