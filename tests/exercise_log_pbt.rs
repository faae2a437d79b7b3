//! Property-Based Tests for the exercise log aggregator
//!
//! Tests the following invariants:
//! - Sort invariant: exercises are non-increasing in time after construction
//! - Streak accounting: every correct attempt lands in exactly one streak
//! - Histogram bounds: streak lengths never exceed the cycle length
//! - Leading-run consistency between most_recent_corrects and the log order

use proptest::prelude::*;

use chrono::{Duration, TimeZone, Utc};
use lingua_backend_rust::services::exercise_log::{
    Exercise, ExerciseOutcome, SortedExerciseLog,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_outcome() -> impl Strategy<Value = ExerciseOutcome> {
    prop_oneof![
        Just(ExerciseOutcome::Correct),
        Just(ExerciseOutcome::TooEasy),
        Just(ExerciseOutcome::Typo),
        Just(ExerciseOutcome::Wrong),
        Just(ExerciseOutcome::Retry),
        Just(ExerciseOutcome::ShowSolution),
    ]
}

fn arb_history() -> impl Strategy<Value = Vec<Exercise>> {
    prop::collection::vec((arb_outcome(), 0i64..=10_000), 0..48).prop_map(|entries| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (outcome, minutes))| Exercise {
                source_id: index as i64,
                time: base + Duration::minutes(minutes),
                outcome,
                solving_speed_ms: 1000,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn construction_sorts_non_increasing(history in arb_history(), cycle in 1usize..8) {
        let log = SortedExerciseLog::new(history, cycle);
        let times: Vec<_> = log.exercises().iter().map(|e| e.time).collect();
        prop_assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn streaks_account_for_every_correct_attempt(history in arb_history(), cycle in 1usize..8) {
        let correct_total = history
            .iter()
            .filter(|e| e.outcome.is_correct())
            .count();
        let wrong_total = history.len() - correct_total;

        let log = SortedExerciseLog::new(history, cycle);
        let histogram = log.count_streaks();

        let accounted: usize = histogram
            .iter()
            .map(|(length, count)| length * count)
            .sum();
        prop_assert_eq!(accounted, correct_total);

        prop_assert!(histogram.keys().all(|length| *length <= cycle));

        // One closure per incorrect attempt, one per completed cycle cap,
        // one trailing closure.
        let closures: usize = histogram.values().sum();
        prop_assert!(closures >= wrong_total + 1);
        prop_assert!(closures <= wrong_total + correct_total / cycle + 1);
    }

    #[test]
    fn leading_run_is_correct_and_maximal(history in arb_history(), cycle in 1usize..8) {
        let log = SortedExerciseLog::new(history, cycle);
        let run = log.most_recent_corrects();

        prop_assert!(run.iter().all(|e| e.outcome.is_correct()));
        if let Some(next) = log.exercises().get(run.len()) {
            prop_assert!(!next.outcome.is_correct());
        }
        prop_assert!(log.most_recent_correct_dates().len() <= run.len());
    }

    #[test]
    fn formatted_dates_never_exceed_the_cycle(history in arb_history(), cycle in 1usize..8) {
        let log = SortedExerciseLog::new(history, cycle);
        let formatted = log.formatted_recent_correct_dates();

        if formatted.is_empty() {
            prop_assert!(log.most_recent_correct_dates().is_empty());
        } else {
            prop_assert!(formatted.split(' ').count() <= cycle);
        }
    }

    #[test]
    fn accessors_are_idempotent(history in arb_history(), cycle in 1usize..8) {
        let log = SortedExerciseLog::new(history, cycle);
        prop_assert_eq!(log.count_streaks(), log.count_streaks());
        prop_assert_eq!(log.summary(), log.summary());
        prop_assert_eq!(log.compact_summary(), log.compact_summary());
    }
}
