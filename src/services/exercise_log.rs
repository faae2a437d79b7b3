use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Outcome vocabulary of a single practice attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseOutcome {
    Correct,
    TooEasy,
    Typo,
    Wrong,
    Retry,
    ShowSolution,
}

impl ExerciseOutcome {
    pub fn from_str(s: &str) -> Self {
        match s {
            "Correct" => Self::Correct,
            "Too easy" => Self::TooEasy,
            "Typo" => Self::Typo,
            "Retry" => Self::Retry,
            "Show solution" => Self::ShowSolution,
            _ => Self::Wrong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "Correct",
            Self::TooEasy => "Too easy",
            Self::Typo => "Typo",
            Self::Wrong => "Wrong",
            Self::Retry => "Retry",
            Self::ShowSolution => "Show solution",
        }
    }

    /// Fixed-width display abbreviation: the first four characters of the label.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Correct => "Corr",
            Self::TooEasy => "Too ",
            Self::Typo => "Typo",
            Self::Wrong => "Wron",
            Self::Retry => "Retr",
            Self::ShowSolution => "Show",
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct | Self::TooEasy)
    }
}

/// One practice attempt on one word. The aggregate below only relies on
/// `time` and `outcome`; the remaining fields ride along for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub source_id: i64,
    pub time: DateTime<Utc>,
    pub outcome: ExerciseOutcome,
    pub solving_speed_ms: i64,
}

impl Exercise {
    pub fn short_summary(&self) -> String {
        format!(
            "{} {}/{}",
            self.outcome.code(),
            self.time.day(),
            self.time.month()
        )
    }
}

/// A user's practice history on one word, sorted most-recent-first at
/// construction and immutable afterwards.
///
/// `cycle_length` is the number of consecutive correct attempts that
/// completes one learning cycle; it caps streak lengths and the number of
/// days shown in the formatted date summary. Callers pass it in explicitly
/// so tests can vary it without global state.
#[derive(Debug, Clone)]
pub struct SortedExerciseLog {
    exercises: Vec<Exercise>,
    cycle_length: usize,
}

impl SortedExerciseLog {
    /// Builds the log from an unordered snapshot of attempts. The sort is
    /// stable, so the relative order of equal timestamps follows the input
    /// (implementation-defined, not a contract).
    pub fn new(mut history: Vec<Exercise>, cycle_length: usize) -> Self {
        history.sort_by(|a, b| b.time.cmp(&a.time));
        Self {
            exercises: history,
            cycle_length,
        }
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn cycle_length(&self) -> usize {
        self.cycle_length
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Most recent attempt. Panics if the log is empty; with
    /// [`last_exercise_time`](Self::last_exercise_time) these are the only
    /// members with an unchecked non-empty precondition.
    pub fn last_exercise(&self) -> &Exercise {
        &self.exercises[0]
    }

    /// Time of the most recent attempt. Panics if the log is empty.
    pub fn last_exercise_time(&self) -> DateTime<Utc> {
        self.exercises[0].time
    }

    /// Total counterpart of [`last_exercise`](Self::last_exercise): `None`
    /// on an empty log instead of panicking.
    pub fn latest_outcome(&self) -> Option<ExerciseOutcome> {
        self.exercises.first().map(|exercise| exercise.outcome)
    }

    /// The current unbroken run of correct attempts, most recent first.
    /// Stops at the first incorrect attempt; correct attempts further back
    /// are never part of the run.
    pub fn most_recent_corrects(&self) -> &[Exercise] {
        let run = self
            .exercises
            .iter()
            .take_while(|exercise| exercise.outcome.is_correct())
            .count();
        &self.exercises[..run]
    }

    /// Distinct UTC calendar days of the current correct run. Several
    /// attempts on the same day collapse into one entry.
    pub fn most_recent_correct_dates(&self) -> HashSet<NaiveDate> {
        self.most_recent_corrects()
            .iter()
            .map(|exercise| exercise.time.date_naive())
            .collect()
    }

    /// Display summary of the current correct run: distinct days sorted
    /// most-recent-first, capped at `cycle_length`, formatted like
    /// `"Jan.05"` and joined with single spaces.
    pub fn formatted_recent_correct_dates(&self) -> String {
        let mut days: Vec<NaiveDate> = self.most_recent_correct_dates().into_iter().collect();
        days.sort_unstable_by(|a, b| b.cmp(a));
        days.truncate(self.cycle_length);

        days.iter()
            .map(|day| day.format("%b.%d").to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Histogram from streak length to number of occurrences, walking the
    /// attempts in the stored most-recent-first order.
    ///
    /// A streak that already sits at `cycle_length` when an attempt is
    /// examined is closed out before that attempt is evaluated, so a run of
    /// corrects longer than the cycle splits into a full cycle plus a new
    /// streak. Incorrect attempts close the running streak at its current
    /// length, which may be zero. The trailing streak is always recorded,
    /// so an empty log yields `{0: 1}`.
    pub fn count_streaks(&self) -> BTreeMap<usize, usize> {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        let mut current_streak = 0usize;

        for exercise in &self.exercises {
            if current_streak == self.cycle_length {
                *counts.entry(current_streak).or_insert(0) += 1;
                current_streak = 0;
            }
            if exercise.outcome.is_correct() {
                current_streak += 1;
            } else {
                *counts.entry(current_streak).or_insert(0) += 1;
                current_streak = 0;
            }
        }

        *counts.entry(current_streak).or_insert(0) += 1;
        counts
    }

    /// One-line log representation, most recent attempt first.
    pub fn summary(&self) -> String {
        self.exercises
            .iter()
            .map(Exercise::short_summary)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Compact display form: `"{day}/{month} {code}   "` per attempt, with
    /// the 4-character outcome abbreviation and three trailing spaces.
    pub fn compact_summary(&self) -> String {
        let mut result = String::new();
        for exercise in &self.exercises {
            result.push_str(&format!(
                "{}/{} {}   ",
                exercise.time.day(),
                exercise.time.month(),
                exercise.outcome.code()
            ));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, outcome: ExerciseOutcome) -> Exercise {
        Exercise {
            source_id: (day * 100 + hour) as i64,
            time: Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap(),
            outcome,
            solving_speed_ms: 1500,
        }
    }

    #[test]
    fn empty_log_properties() {
        let log = SortedExerciseLog::new(Vec::new(), 4);
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert_eq!(log.latest_outcome(), None);
        assert!(log.most_recent_corrects().is_empty());
        assert!(log.most_recent_correct_dates().is_empty());
        assert_eq!(log.formatted_recent_correct_dates(), "");
        assert_eq!(log.count_streaks(), BTreeMap::from([(0, 1)]));
    }

    #[test]
    #[should_panic]
    fn last_exercise_panics_on_empty_log() {
        let log = SortedExerciseLog::new(Vec::new(), 4);
        let _ = log.last_exercise();
    }

    #[test]
    fn construction_sorts_most_recent_first() {
        let history = vec![
            at(3, 9, ExerciseOutcome::Wrong),
            at(7, 12, ExerciseOutcome::Correct),
            at(1, 8, ExerciseOutcome::Typo),
            at(5, 18, ExerciseOutcome::Correct),
        ];
        let log = SortedExerciseLog::new(history, 4);

        let times: Vec<_> = log.exercises().iter().map(|e| e.time).collect();
        assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(log.last_exercise().source_id, 712);
        assert_eq!(log.last_exercise_time(), log.exercises()[0].time);
        assert_eq!(log.latest_outcome(), Some(ExerciseOutcome::Correct));
    }

    #[test]
    fn most_recent_corrects_short_circuits() {
        // Most recent first: correct, correct, wrong, correct.
        let log = SortedExerciseLog::new(
            vec![
                at(8, 10, ExerciseOutcome::Correct),
                at(7, 10, ExerciseOutcome::Correct),
                at(6, 10, ExerciseOutcome::Wrong),
                at(5, 10, ExerciseOutcome::Correct),
            ],
            4,
        );

        let run = log.most_recent_corrects();
        assert_eq!(run.len(), 2);
        assert_eq!(run[0].source_id, 810);
        assert_eq!(run[1].source_id, 710);
    }

    #[test]
    fn too_easy_counts_as_correct() {
        let log = SortedExerciseLog::new(
            vec![
                at(8, 10, ExerciseOutcome::TooEasy),
                at(7, 10, ExerciseOutcome::Correct),
            ],
            4,
        );
        assert_eq!(log.most_recent_corrects().len(), 2);
    }

    #[test]
    fn correct_dates_collapse_same_day() {
        let log = SortedExerciseLog::new(
            vec![
                at(8, 18, ExerciseOutcome::Correct),
                at(8, 9, ExerciseOutcome::Correct),
                at(7, 10, ExerciseOutcome::Correct),
            ],
            4,
        );

        let dates = log.most_recent_correct_dates();
        assert_eq!(dates.len(), 2);
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
    }

    #[test]
    fn formatted_dates_are_descending_and_capped() {
        let log = SortedExerciseLog::new(
            vec![
                at(9, 10, ExerciseOutcome::Correct),
                at(8, 10, ExerciseOutcome::Correct),
                at(7, 10, ExerciseOutcome::Correct),
                at(5, 10, ExerciseOutcome::Correct),
            ],
            3,
        );

        assert_eq!(log.formatted_recent_correct_dates(), "Jan.09 Jan.08 Jan.07");
    }

    #[test]
    fn streaks_of_empty_and_all_wrong_logs() {
        let empty = SortedExerciseLog::new(Vec::new(), 4);
        assert_eq!(empty.count_streaks(), BTreeMap::from([(0, 1)]));

        let all_wrong = SortedExerciseLog::new(
            vec![at(8, 10, ExerciseOutcome::Wrong), at(7, 10, ExerciseOutcome::Wrong)],
            4,
        );
        assert_eq!(all_wrong.count_streaks(), BTreeMap::from([(0, 3)]));
    }

    #[test]
    fn streak_reaching_cycle_length_is_closed_before_the_next_attempt() {
        // Five corrects with a cycle of four: the full cycle closes as the
        // fifth attempt is examined, which then starts a fresh streak.
        let history = (1..=5)
            .map(|day| at(day, 10, ExerciseOutcome::Correct))
            .collect();
        let log = SortedExerciseLog::new(history, 4);

        assert_eq!(log.count_streaks(), BTreeMap::from([(4, 1), (1, 1)]));
    }

    #[test]
    fn streaks_split_on_incorrect_attempts() {
        // Most recent first: C C W C C C W W C.
        let outcomes = [
            ExerciseOutcome::Correct,
            ExerciseOutcome::Correct,
            ExerciseOutcome::Wrong,
            ExerciseOutcome::Correct,
            ExerciseOutcome::Correct,
            ExerciseOutcome::Correct,
            ExerciseOutcome::Wrong,
            ExerciseOutcome::Wrong,
            ExerciseOutcome::Correct,
        ];
        let history = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| at(20 - i as u32, 10, *outcome))
            .collect();
        let log = SortedExerciseLog::new(history, 4);

        // Closures: 2 at the first wrong, 3 at the second, 0 at the third,
        // then the trailing run of one.
        assert_eq!(
            log.count_streaks(),
            BTreeMap::from([(2, 1), (3, 1), (0, 1), (1, 1)])
        );
    }

    #[test]
    fn incorrect_attempt_at_the_cap_closes_twice() {
        // Four corrects then a wrong with cycle 4: the cap closure and the
        // zero-length streak broken by the wrong attempt are both recorded.
        let history = vec![
            at(9, 10, ExerciseOutcome::Correct),
            at(8, 10, ExerciseOutcome::Correct),
            at(7, 10, ExerciseOutcome::Correct),
            at(6, 10, ExerciseOutcome::Correct),
            at(5, 10, ExerciseOutcome::Wrong),
        ];
        let log = SortedExerciseLog::new(history, 4);

        assert_eq!(log.count_streaks(), BTreeMap::from([(4, 1), (0, 2)]));
    }

    #[test]
    fn summaries_pin_their_formats() {
        let log = SortedExerciseLog::new(
            vec![
                at(5, 10, ExerciseOutcome::Correct),
                at(3, 10, ExerciseOutcome::ShowSolution),
            ],
            4,
        );

        assert_eq!(log.summary(), "Corr 5/1 Show 3/1");
        assert_eq!(log.compact_summary(), "5/1 Corr   3/1 Show   ");
    }

    #[test]
    fn accessors_are_idempotent() {
        let log = SortedExerciseLog::new(
            vec![
                at(8, 10, ExerciseOutcome::Correct),
                at(7, 10, ExerciseOutcome::Wrong),
                at(6, 10, ExerciseOutcome::Correct),
            ],
            4,
        );

        assert_eq!(log.count_streaks(), log.count_streaks());
        assert_eq!(log.summary(), log.summary());
        assert_eq!(log.formatted_recent_correct_dates(), log.formatted_recent_correct_dates());
        assert_eq!(log.most_recent_corrects().len(), log.most_recent_corrects().len());
    }

    #[test]
    fn outcome_codes_are_four_characters() {
        for outcome in [
            ExerciseOutcome::Correct,
            ExerciseOutcome::TooEasy,
            ExerciseOutcome::Typo,
            ExerciseOutcome::Wrong,
            ExerciseOutcome::Retry,
            ExerciseOutcome::ShowSolution,
        ] {
            assert_eq!(outcome.code().len(), 4);
            assert!(outcome.as_str().starts_with(outcome.code().trim_end()));
        }
    }

    #[test]
    fn outcome_round_trips_through_labels() {
        for outcome in [
            ExerciseOutcome::Correct,
            ExerciseOutcome::TooEasy,
            ExerciseOutcome::Typo,
            ExerciseOutcome::Wrong,
            ExerciseOutcome::Retry,
            ExerciseOutcome::ShowSolution,
        ] {
            assert_eq!(ExerciseOutcome::from_str(outcome.as_str()), outcome);
        }
        assert_eq!(ExerciseOutcome::from_str("garbled"), ExerciseOutcome::Wrong);
    }
}
