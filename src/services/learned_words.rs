use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::bookmarks::Bookmark;
use crate::services::exercise_log::SortedExerciseLog;

/// A word counts as learned once the current unbroken run of correct
/// attempts spans a full learning cycle of distinct calendar days.
pub fn is_learned(log: &SortedExerciseLog) -> bool {
    log.most_recent_correct_dates().len() >= log.cycle_length()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedWordReport {
    pub bookmark_id: String,
    pub origin: String,
    pub origin_lang: String,
    pub translation: String,
    pub translation_lang: String,
    pub exercise_count: usize,
    pub latest_outcome: Option<&'static str>,
    pub learned_dates: String,
    pub streaks: BTreeMap<usize, usize>,
    pub learned: bool,
}

pub fn build_report(bookmark: &Bookmark, log: &SortedExerciseLog) -> LearnedWordReport {
    LearnedWordReport {
        bookmark_id: bookmark.id.clone(),
        origin: bookmark.origin.clone(),
        origin_lang: bookmark.origin_lang.clone(),
        translation: bookmark.translation.clone(),
        translation_lang: bookmark.translation_lang.clone(),
        exercise_count: log.len(),
        latest_outcome: log.latest_outcome().map(|outcome| outcome.as_str()),
        learned_dates: log.formatted_recent_correct_dates(),
        streaks: log.count_streaks(),
        learned: is_learned(log),
    }
}
