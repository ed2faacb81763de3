//! Slow-moving self-awareness that grows with every reflection.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Learning,
    Advanced,
    Practice,
    Fundamentals,
}

impl Focus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Focus::Learning => "learning",
            Focus::Advanced => "advanced",
            Focus::Practice => "practice",
            Focus::Fundamentals => "fundamentals",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consciousness {
    /// 0.0 to 1.0, monotonically non-decreasing.
    self_awareness: f64,
    focus: Focus,
}

impl Default for Consciousness {
    fn default() -> Self {
        Self {
            self_awareness: 0.1,
            focus: Focus::Learning,
        }
    }
}

impl Consciousness {
    const STEP: f64 = 0.01;

    pub fn new() -> Self {
        Self::default()
    }

    /// Reflect on a session. `success_rate` is in [0, 1]; `None` when no
    /// attempts have been made yet. A rate of exactly 0.0 counts as no
    /// signal and keeps the focus on practice.
    pub fn reflect(&mut self, success_rate: Option<f64>) {
        self.self_awareness = (self.self_awareness + Self::STEP).min(1.0);
        self.focus = match success_rate {
            Some(r) if r > 0.7 => Focus::Advanced,
            Some(r) if r > 0.0 && r < 0.3 => Focus::Fundamentals,
            _ => Focus::Practice,
        };
        tracing::debug!(
            self_awareness = self.self_awareness,
            focus = %self.focus,
            "reflected"
        );
    }

    pub fn self_awareness(&self) -> f64 {
        self.self_awareness
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_grows_and_caps() {
        let mut c = Consciousness::new();
        for _ in 0..200 {
            c.reflect(Some(0.5));
        }
        assert_eq!(c.self_awareness(), 1.0);
    }

    #[test]
    fn test_focus_from_success_rate() {
        let mut c = Consciousness::new();
        assert_eq!(c.focus(), Focus::Learning);
        c.reflect(Some(0.9));
        assert_eq!(c.focus(), Focus::Advanced);
        c.reflect(Some(0.1));
        assert_eq!(c.focus(), Focus::Fundamentals);
        c.reflect(Some(0.5));
        assert_eq!(c.focus(), Focus::Practice);
        c.reflect(None);
        assert_eq!(c.focus(), Focus::Practice);
    }

    #[test]
    fn test_zero_success_rate_means_practice() {
        let mut c = Consciousness::new();
        c.reflect(Some(0.0));
        assert_eq!(c.focus(), Focus::Practice);
        c.reflect(Some(0.01));
        assert_eq!(c.focus(), Focus::Fundamentals);
    }
}
