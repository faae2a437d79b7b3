use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::{bookmarks, exercises};
use crate::response::AppError;
use crate::routes::{require_user, SuccessResponse};
use crate::services::exercise_log::SortedExerciseLog;
use crate::services::learned_words::{self, LearnedWordReport};
use crate::state::AppState;

const LEARNED_WORDS_SCAN_LIMIT: i64 = 500;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseLogResponse {
    bookmark_id: String,
    exercise_count: usize,
    latest_outcome: Option<&'static str>,
    summary: String,
    compact_summary: String,
    learned_dates: String,
    streaks: BTreeMap<usize, usize>,
    learned: bool,
}

/// The user's words whose current correct run spans a full learning cycle.
pub async fn learned_words(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (user, pool) = match require_user(&state, &headers).await {
        Ok(value) => value,
        Err(err) => return err.into_response(),
    };

    let user_bookmarks =
        match bookmarks::list_for_user(&pool, &user.id, LEARNED_WORDS_SCAN_LIMIT).await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(error = %err, "bookmark list query failed");
                return AppError::internal(err).into_response();
            }
        };

    let cycle_length = state.learning().cycle_length;
    let mut reports: Vec<LearnedWordReport> = Vec::new();

    for bookmark in &user_bookmarks {
        let history = match exercises::fetch_history(&pool, &bookmark.id).await {
            Ok(history) => history,
            Err(err) => {
                tracing::warn!(error = %err, bookmark_id = %bookmark.id, "exercise history query failed");
                return AppError::internal(err).into_response();
            }
        };

        let log = SortedExerciseLog::new(history, cycle_length);
        if learned_words::is_learned(&log) {
            reports.push(learned_words::build_report(bookmark, &log));
        }
    }

    Json(SuccessResponse::new(reports)).into_response()
}

/// Aggregated practice history of one bookmark.
pub async fn exercise_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (user, pool) = match require_user(&state, &headers).await {
        Ok(value) => value,
        Err(err) => return err.into_response(),
    };

    let bookmark = match bookmarks::find_by_id(&pool, &id).await {
        Ok(Some(bookmark)) => bookmark,
        Ok(None) => return AppError::not_found("bookmark not found").into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "bookmark lookup failed");
            return AppError::internal(err).into_response();
        }
    };

    if bookmark.user_id != user.id {
        return AppError::forbidden("bookmark belongs to another user").into_response();
    }

    let history = match exercises::fetch_history(&pool, &bookmark.id).await {
        Ok(history) => history,
        Err(err) => {
            tracing::warn!(error = %err, "exercise history query failed");
            return AppError::internal(err).into_response();
        }
    };

    let log = SortedExerciseLog::new(history, state.learning().cycle_length);

    Json(SuccessResponse::new(ExerciseLogResponse {
        bookmark_id: bookmark.id,
        exercise_count: log.len(),
        latest_outcome: log.latest_outcome().map(|outcome| outcome.as_str()),
        summary: log.summary(),
        compact_summary: log.compact_summary(),
        learned_dates: log.formatted_recent_correct_dates(),
        streaks: log.count_streaks(),
        learned: learned_words::is_learned(&log),
    }))
    .into_response()
}
