use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{PgPool, Row};

use crate::services::exercise_log::{Exercise, ExerciseOutcome};

/// Snapshot of a bookmark's practice history. No ordering is requested
/// here; the exercise log sorts its own copy at construction.
pub async fn fetch_history(pool: &PgPool, bookmark_id: &str) -> Result<Vec<Exercise>, String> {
    let rows = sqlx::query(
        r#"SELECT "id", "time", "outcome", "solvingSpeed"
           FROM "exercises" WHERE "bookmarkId" = $1"#,
    )
    .bind(bookmark_id)
    .fetch_all(pool)
    .await
    .map_err(|e| format!("exercise query failed: {e}"))?;

    rows.iter()
        .map(|row| {
            let time: NaiveDateTime = row
                .try_get("time")
                .map_err(|e| format!("exercise parse failed: {e}"))?;
            let outcome: String = row
                .try_get("outcome")
                .map_err(|e| format!("exercise parse failed: {e}"))?;

            Ok(Exercise {
                source_id: row
                    .try_get("id")
                    .map_err(|e| format!("exercise parse failed: {e}"))?,
                time: DateTime::<Utc>::from_naive_utc_and_offset(time, Utc),
                outcome: ExerciseOutcome::from_str(&outcome),
                solving_speed_ms: row.try_get("solvingSpeed").unwrap_or(0),
            })
        })
        .collect()
}
