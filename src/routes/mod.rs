mod bookmarks;
mod feedback;
mod health;
mod translation;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::{self, AuthUser};
use crate::response::{json_error, AppError};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/translate/:from_lang/:to_lang",
            post(translation::get_one_translation),
        )
        .route(
            "/api/translate/:from_lang/:to_lang/alternatives",
            post(translation::get_multiple_translations),
        )
        .route(
            "/api/translate/basic/:from_lang/:to_lang",
            post(translation::basic_translate),
        )
        .route(
            "/api/contribute/:from_lang/:to_lang",
            post(translation::contribute_translation),
        )
        .route(
            "/api/bookmarks/:id/translation",
            post(translation::update_bookmark_translation),
        )
        .route(
            "/api/bookmarks/:id/exercise-log",
            get(bookmarks::exercise_log),
        )
        .route("/api/words/learned", get(bookmarks::learned_words))
        .route("/api/feedback/article", post(feedback::article_feedback))
        .nest("/health", health::router())
        .nest("/api/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

#[derive(Serialize)]
pub(crate) struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Shared handler preamble: token present, store reachable, session valid.
pub(crate) async fn require_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(AuthUser, PgPool), AppError> {
    let token = auth::extract_token(headers)
        .ok_or_else(|| AppError::unauthorized("missing auth token"))?;

    let pool = state
        .db_pool()
        .ok_or_else(|| AppError::service_unavailable("service unavailable"))?;

    let user = auth::verify_request_token(&pool, &token)
        .await
        .map_err(|_| AppError::unauthorized("authentication failed"))?;

    Ok((user, pool))
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
