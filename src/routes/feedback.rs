use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::AppError;
use crate::routes::require_user;
use crate::services::mailer::MAIL_SIGN_OFF;
use crate::state::AppState;

/// One notification per user within this window.
const FEEDBACK_RATE_LIMIT_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFeedbackRequest {
    pub feedback: String,
    pub article_title: String,
    pub article_url: String,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

/// Forwards a reader's feedback on an article to the feedback inbox.
pub async fn article_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ArticleFeedbackRequest>,
) -> Response {
    let (user, _pool) = match require_user(&state, &headers).await {
        Ok(value) => value,
        Err(err) => return err.into_response(),
    };

    if body.feedback.trim().is_empty() {
        return AppError::bad_request("feedback is required").into_response();
    }

    let mailer = state.mailer();
    if !mailer.is_available() {
        return AppError::service_unavailable("email service unavailable").into_response();
    }

    if !mailer.check_rate_limit(&user.email, FEEDBACK_RATE_LIMIT_SECS) {
        return AppError::too_many_requests("feedback already sent, try again later")
            .into_response();
    }

    let subject = format!("{} - {}", user.name, body.article_title);
    let lines = vec![
        format!("{} {}", body.feedback.trim(), body.article_url),
        format!("From: {} <{}>", user.name, user.email),
        String::new(),
        MAIL_SIGN_OFF.to_string(),
    ];

    let to = mailer.feedback_address().to_string();
    if let Err(err) = mailer.send_mail(&to, &subject, &lines).await {
        tracing::warn!(error = %err, "feedback mail send failed");
        return AppError::internal("feedback mail send failed").into_response();
    }
    mailer.record_send(&user.email);

    Json(MessageResponse {
        success: true,
        message: "feedback sent",
    })
    .into_response()
}
