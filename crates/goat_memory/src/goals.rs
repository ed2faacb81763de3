//! Goal System
//!
//! A bounded list of active goals, each moving `active → completed`
//! exactly once. Completion happens when progress reaches 1.0 or when a
//! goal is completed explicitly. Completed goals are frozen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Goal Data Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Monotonic per tracker, never reused.
    pub id: u64,
    pub description: String,
    /// Higher = more important.
    pub priority: i32,
    /// Progress 0.0-1.0.
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    #[error("Goal {0} not found among active goals")]
    NotFound(u64),
    #[error("Cannot add more goals: limit of {max} active goals reached")]
    LimitExceeded { max: usize },
}

/// Result of a progress update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub id: u64,
    /// The stored (clamped) progress.
    pub progress: f64,
    /// True when this update moved the goal to the completed list.
    pub completed: bool,
}

// ============================================================================
// Goal Tracker
// ============================================================================

#[derive(Debug)]
pub struct GoalTracker {
    active: Vec<Goal>,
    completed: Vec<Goal>,
    max_active: usize,
    next_id: u64,
}

impl GoalTracker {
    pub fn new(max_active: usize) -> Self {
        Self {
            active: Vec::new(),
            completed: Vec::new(),
            max_active,
            next_id: 1,
        }
    }

    /// Create a new goal with progress 0. Returns its id.
    pub fn add_goal(&mut self, description: &str, priority: i32) -> Result<u64, GoalError> {
        if self.active.len() >= self.max_active {
            return Err(GoalError::LimitExceeded {
                max: self.max_active,
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.active.push(Goal {
            id,
            description: description.trim().to_string(),
            priority,
            progress: 0.0,
            created_at: Utc::now(),
            completed_at: None,
        });
        tracing::debug!(id, priority, "goal added");
        Ok(id)
    }

    /// Set progress (clamped to [0, 1], NaN → 0). Reaching 1.0 completes the goal.
    pub fn update_progress(&mut self, id: u64, value: f64) -> Result<ProgressUpdate, GoalError> {
        let idx = self.position(id)?;
        let progress = clamp_progress(value);
        self.active[idx].progress = progress;

        let completed = progress >= 1.0;
        if completed {
            self.finish(idx);
        }
        Ok(ProgressUpdate {
            id,
            progress,
            completed,
        })
    }

    /// Force completion regardless of progress.
    pub fn complete_goal(&mut self, id: u64) -> Result<&Goal, GoalError> {
        let idx = self.position(id)?;
        Ok(self.finish(idx))
    }

    /// Active goals in creation order.
    pub fn active(&self) -> &[Goal] {
        &self.active
    }

    /// Completed goals in completion order.
    pub fn completed(&self) -> &[Goal] {
        &self.completed
    }

    /// Look up a goal in either list.
    pub fn get(&self, id: u64) -> Option<&Goal> {
        self.active
            .iter()
            .chain(self.completed.iter())
            .find(|g| g.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    fn position(&self, id: u64) -> Result<usize, GoalError> {
        self.active
            .iter()
            .position(|g| g.id == id)
            .ok_or(GoalError::NotFound(id))
    }

    /// Move the active goal at `idx` into the completed list.
    fn finish(&mut self, idx: usize) -> &Goal {
        let mut goal = self.active.remove(idx);
        goal.completed_at = Some(Utc::now());
        tracing::info!(id = goal.id, "goal completed: {}", goal.description);
        self.completed.push(goal);
        &self.completed[self.completed.len() - 1]
    }
}

fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_tests_scenario() {
        let mut goals = GoalTracker::new(5);
        let id = goals.add_goal("write tests", 1).unwrap();
        assert_eq!(id, 1);
        assert_eq!(goals.active().len(), 1);
        assert_eq!(goals.active()[0].progress, 0.0);

        let update = goals.update_progress(1, 0.5).unwrap();
        assert_eq!(update.progress, 0.5);
        assert!(!update.completed);
        assert_eq!(goals.active()[0].progress, 0.5);

        let update = goals.update_progress(1, 1.2).unwrap();
        assert_eq!(update.progress, 1.0);
        assert!(update.completed);
        assert!(goals.active().is_empty());
        assert_eq!(goals.completed().len(), 1);
        assert_eq!(goals.completed()[0].progress, 1.0);
        assert!(goals.completed()[0].completed_at.is_some());
    }

    #[test]
    fn test_limit_exceeded_leaves_state_unchanged() {
        let mut goals = GoalTracker::new(2);
        goals.add_goal("a", 1).unwrap();
        goals.add_goal("b", 1).unwrap();
        let err = goals.add_goal("c", 1).unwrap_err();
        assert_eq!(err, GoalError::LimitExceeded { max: 2 });
        assert_eq!(goals.active_count(), 2);
        // The failed add must not burn an id
        goals.complete_goal(1).unwrap();
        assert_eq!(goals.add_goal("d", 1).unwrap(), 3);
    }

    #[test]
    fn test_ids_not_reused_after_completion() {
        let mut goals = GoalTracker::new(1);
        let a = goals.add_goal("a", 1).unwrap();
        goals.complete_goal(a).unwrap();
        let b = goals.add_goal("b", 1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_second_completion_is_not_found() {
        let mut goals = GoalTracker::new(5);
        let id = goals.add_goal("once", 1).unwrap();
        goals.update_progress(id, 1.0).unwrap();
        assert_eq!(goals.update_progress(id, 1.0), Err(GoalError::NotFound(id)));
        assert_eq!(goals.complete_goal(id).unwrap_err(), GoalError::NotFound(id));
        assert_eq!(goals.completed().len(), 1);
    }

    #[test]
    fn test_negative_and_nan_progress_clamped() {
        let mut goals = GoalTracker::new(5);
        let id = goals.add_goal("x", 1).unwrap();
        assert_eq!(goals.update_progress(id, -3.0).unwrap().progress, 0.0);
        assert_eq!(goals.update_progress(id, f64::NAN).unwrap().progress, 0.0);
        assert_eq!(goals.get(id).unwrap().progress, 0.0);
    }

    #[test]
    fn test_forced_completion_keeps_progress() {
        let mut goals = GoalTracker::new(5);
        let id = goals.add_goal("half done", 2).unwrap();
        goals.update_progress(id, 0.4).unwrap();
        let done = goals.complete_goal(id).unwrap();
        assert_eq!(done.progress, 0.4);
        assert!(done.is_completed());
        assert!(goals.active().is_empty());
    }

    #[test]
    fn test_unknown_goal() {
        let mut goals = GoalTracker::new(5);
        assert_eq!(goals.update_progress(42, 0.1), Err(GoalError::NotFound(42)));
    }
}
