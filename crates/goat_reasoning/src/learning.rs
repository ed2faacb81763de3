//! Simulated practice sessions.
//!
//! A session picks a task, rolls for success and produces a reward for the
//! mood model plus a memory record. Rewards are scaled by the configured
//! learning rate relative to the 0.25 baseline.

use crate::prompts::{CODE_PROBLEMS, LOGIC_PUZZLES};
use goat_memory::MemoryRecord;
use rand::Rng;
use std::fmt;

/// Learning rate at which rewards keep their nominal magnitude.
pub const BASELINE_LEARNING_RATE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Code,
    Logic,
}

impl Discipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Code => "code",
            Discipline::Logic => "logic",
        }
    }

    fn success_probability(&self) -> f64 {
        match self {
            Discipline::Code => 0.7,
            Discipline::Logic => 0.6,
        }
    }

    /// Nominal (reward on success, reward on failure).
    fn rewards(&self) -> (f64, f64) {
        match self {
            Discipline::Code => (0.8, -0.5),
            Discipline::Logic => (0.6, -0.3),
        }
    }

    /// Record importance on (success, failure).
    fn importance(&self) -> (f64, f64) {
        match self {
            Discipline::Code => (0.6, 0.3),
            Discipline::Logic => (0.7, 0.3),
        }
    }

    fn tasks(&self) -> &'static [&'static str] {
        match self {
            Discipline::Code => &CODE_PROBLEMS,
            Discipline::Logic => &LOGIC_PUZZLES,
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeOutcome {
    pub discipline: Discipline,
    pub task: &'static str,
    pub success: bool,
    /// Simulated thinking time, logic puzzles only.
    pub reasoning_secs: Option<u32>,
    /// Scaled reward to feed the mood model.
    pub reward: f64,
}

impl PracticeOutcome {
    /// One-line summary shown to the user.
    pub fn message(&self) -> String {
        match (self.discipline, self.success, self.reasoning_secs) {
            (Discipline::Logic, true, Some(secs)) => {
                format!("✓ Solved puzzle in {}s: {}", secs, self.task)
            }
            (Discipline::Logic, false, Some(secs)) => {
                format!("✗ Challenging puzzle: {} (took {}s)", self.task, secs)
            }
            (_, true, _) => format!("✓ Successfully solved: {}", self.task),
            (_, false, _) => format!("✗ Need more practice with: {}", self.task),
        }
    }

    pub fn to_record(&self) -> MemoryRecord {
        let (hit, miss) = self.discipline.importance();
        let importance = if self.success { hit } else { miss };
        match self.discipline {
            Discipline::Code => MemoryRecord::new("code_practice", importance)
                .with_field("problem", self.task)
                .with_field("success", self.success),
            Discipline::Logic => MemoryRecord::new("logic_puzzle", importance)
                .with_field("puzzle", self.task)
                .with_field("success", self.success)
                .with_field("reasoning_secs", self.reasoning_secs.unwrap_or(0)),
        }
    }
}

/// Run one practice session.
pub fn practice<R: Rng + ?Sized>(
    discipline: Discipline,
    learning_rate: f64,
    rng: &mut R,
) -> PracticeOutcome {
    let tasks = discipline.tasks();
    let task = tasks[rng.gen_range(0..tasks.len())];
    let reasoning_secs = match discipline {
        Discipline::Logic => Some(rng.gen_range(1..=10)),
        Discipline::Code => None,
    };
    let success = rng.gen_bool(discipline.success_probability());

    let (on_success, on_failure) = discipline.rewards();
    let nominal = if success { on_success } else { on_failure };
    let reward = nominal * (learning_rate / BASELINE_LEARNING_RATE);

    tracing::debug!(%discipline, success, reward, "practice session");
    PracticeOutcome {
        discipline,
        task,
        success,
        reasoning_secs,
        reward,
    }
}
