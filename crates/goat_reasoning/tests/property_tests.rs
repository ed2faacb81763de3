//! Property-based tests for goat_reasoning.
//!
//! The calculator and sandbox take raw user text, so they must reject
//! garbage without panicking, and the dispatcher must turn every failure
//! into a reply.

use goat_core::config::GoatConfig;
use goat_reasoning::calc;
use goat_reasoning::{ArithmeticSandbox, CodeRunner, Command, Dispatcher};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    /// Arbitrary input never panics the calculator, and any success is finite.
    #[test]
    fn calculator_total(input in ".{0,64}") {
        if let Ok(v) = calc::evaluate(&input) {
            prop_assert!(v.is_finite());
        }
    }

    /// Integer sums and products agree with native arithmetic.
    #[test]
    fn calculator_matches_native(a in -1000i64..1000, b in -1000i64..1000, c in 1i64..1000) {
        let expr = format!("{} + {} * {}", a, b, c);
        prop_assert_eq!(calc::evaluate(&expr).unwrap(), (a + b * c) as f64);

        let expr = format!("({} - {}) * {}", a, b, c);
        prop_assert_eq!(calc::evaluate(&expr).unwrap(), ((a - b) * c) as f64);
    }

    /// The sandbox never panics on arbitrary text.
    #[test]
    fn sandbox_total(input in "[a-z0-9 =+*/();\n-]{0,80}") {
        let _ = ArithmeticSandbox::new().run(&input);
    }

    /// Parsing is total: every line is either a command, chat, or a malformed error.
    #[test]
    fn parse_total(input in ".{0,40}") {
        let _ = Command::parse(&input);
    }

    /// The dispatcher answers every line and never exits unless asked.
    #[test]
    fn dispatcher_always_replies(lines in prop::collection::vec("[a-z 0-9.]{0,24}", 1..12)) {
        let mut d = Dispatcher::with_rng(GoatConfig::default(), StdRng::seed_from_u64(9)).unwrap();
        for line in lines {
            let reply = d.handle_turn(&line);
            prop_assert!(!reply.text.is_empty());
            let trimmed = line.trim();
            let is_exit = ["exit", "quit", "bye"].contains(&trimmed);
            prop_assert_eq!(reply.exit, is_exit);
            prop_assert!(d.goals().active_count() <= d.goals().max_active());
        }
    }
}
