//! Property-based tests for goat_memory.
//!
//! Goal-tracker transitions and memory recall ordering must hold for all
//! inputs, not just the hand-picked scenarios in the unit tests.

use goat_memory::{GoalError, GoalTracker, MemoryRecord, MemoryStore};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_progress() -> impl Strategy<Value = f64> {
    prop_oneof![
        -2.0f64..=2.0,
        Just(0.0),
        Just(1.0),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

const VOCAB: &[&str] = &["goat", "rust", "logic", "puzzle", "hello", "learn", "code", "tests"];

fn arb_sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 1..6).prop_map(|w| w.join(" "))
}

fn arb_store() -> impl Strategy<Value = MemoryStore> {
    prop::collection::vec((arb_sentence(), 0.0f64..=1.0), 0..40).prop_map(|entries| {
        let mut store = MemoryStore::new();
        for (text, importance) in entries {
            store.append(MemoryRecord::new("conversation", importance).with_field("user_message", text));
        }
        store
    })
}

// ============================================================================
// GoalTracker
// ============================================================================

proptest! {
    /// Adding below the limit grows the active list by exactly one.
    #[test]
    fn add_below_max_grows_by_one(max in 1usize..10, descs in prop::collection::vec("[a-z ]{1,20}", 1..20)) {
        let mut goals = GoalTracker::new(max);
        for d in descs {
            let before = goals.active_count();
            let result = goals.add_goal(&d, 1);
            if before < max {
                prop_assert!(result.is_ok());
                prop_assert_eq!(goals.active_count(), before + 1);
            } else {
                prop_assert_eq!(result, Err(GoalError::LimitExceeded { max }));
                prop_assert_eq!(goals.active_count(), before);
            }
            prop_assert!(goals.active_count() <= max);
        }
    }

    /// Stored progress is always clamp(p, 0, 1); p >= 1 completes exactly once.
    #[test]
    fn progress_is_clamped(p in arb_progress()) {
        let mut goals = GoalTracker::new(1);
        let id = goals.add_goal("g", 1).unwrap();
        let update = goals.update_progress(id, p).unwrap();
        prop_assert_eq!(update.progress, p.clamp(0.0, 1.0));

        if p >= 1.0 {
            prop_assert!(update.completed);
            prop_assert_eq!(goals.completed().len(), 1);
            prop_assert!(goals.active().is_empty());
            prop_assert_eq!(goals.update_progress(id, p), Err(GoalError::NotFound(id)));
        } else {
            prop_assert!(!update.completed);
            prop_assert_eq!(goals.active()[0].progress, update.progress);
        }
    }

    /// A goal id never appears in both lists.
    #[test]
    fn active_and_completed_disjoint(ops in prop::collection::vec((1u64..6, arb_progress()), 0..40)) {
        let mut goals = GoalTracker::new(3);
        for (id, p) in ops {
            let _ = goals.add_goal("g", 1);
            let _ = goals.update_progress(id, p);
            for a in goals.active() {
                prop_assert!(goals.completed().iter().all(|c| c.id != a.id));
            }
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

proptest! {
    /// Recall never returns non-positive scores, respects top_k and is sorted.
    #[test]
    fn search_results_well_formed(store in arb_store(), query in arb_sentence(), top_k in 0usize..10) {
        let hits = store.search_similar(&query, top_k);
        prop_assert!(hits.len() <= top_k);
        for h in &hits {
            prop_assert!(h.score > 0.0);
        }
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// The FIFO bound is never exceeded.
    #[test]
    fn capacity_respected(cap in 1usize..20, n in 0usize..60) {
        let mut store = MemoryStore::with_capacity(cap);
        for i in 0..n {
            store.append(MemoryRecord::new("k", 0.5).with_field("i", i as u64));
        }
        prop_assert_eq!(store.len(), n.min(cap));
    }
}
