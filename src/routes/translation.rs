use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::bookmarks;
use crate::response::AppError;
use crate::routes::{require_user, SuccessResponse};
use crate::services::translator::{self, TranslationCandidate, TranslationQuery};
use crate::state::AppState;

const DEFAULT_ALTERNATIVES: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub word: String,
    #[serde(default)]
    pub context: String,
    pub article_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativesRequest {
    pub word: String,
    #[serde(default)]
    pub context: String,
    pub number_of_results: Option<usize>,
    pub translation_to_exclude: Option<String>,
    pub service_to_exclude: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicTranslateRequest {
    pub phrase: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributeRequest {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub context: String,
    pub article_id: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookmarkRequest {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslationResponse {
    translation: String,
    bookmark_id: String,
    source: String,
    likelihood: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlternativesResponse {
    translations: Vec<TranslationCandidate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BasicTranslationResponse {
    translation: String,
    source: String,
    likelihood: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkIdResponse {
    bookmark_id: String,
}

/// Best-guess translation of a word in context. The user's own earlier
/// translation of the same word in the same context wins over the
/// translation service, and the result is persisted as a bookmark.
pub async fn get_one_translation(
    State(state): State<AppState>,
    Path((from_lang, to_lang)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<TranslateRequest>,
) -> Response {
    let (user, pool) = match require_user(&state, &headers).await {
        Ok(value) => value,
        Err(err) => return err.into_response(),
    };

    let word = strip_punctuation(&body.word);
    if word.is_empty() {
        return AppError::bad_request("word is required").into_response();
    }
    let context = body.context.trim();

    let own_past = match bookmarks::find_own_past_translation(
        &pool, &user.id, word, &from_lang, &to_lang, context,
    )
    .await
    {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!(error = %err, "own past translation lookup failed");
            return AppError::internal(err).into_response();
        }
    };

    if let Some(bookmark) = own_past {
        return Json(SuccessResponse::new(TranslationResponse {
            translation: bookmark.translation.clone(),
            bookmark_id: bookmark.id,
            source: "Own past translation".to_string(),
            likelihood: Some(1.0),
        }))
        .into_response();
    }

    let query = TranslationQuery {
        word: word.to_string(),
        from_lang: from_lang.clone(),
        to_lang: to_lang.clone(),
        context: context.to_string(),
    };
    let best_guess = match state.translator().best_guess(&query) {
        Ok(candidate) => candidate,
        Err(err) => {
            tracing::warn!(error = %err, "translation lookup failed");
            return AppError::service_unavailable("translation service unavailable")
                .into_response();
        }
    };

    let bookmark = match bookmarks::find_or_create(
        &pool,
        &user.id,
        word,
        &from_lang,
        &best_guess.translation,
        &to_lang,
        context,
        body.article_id.as_deref(),
    )
    .await
    {
        Ok(bookmark) => bookmark,
        Err(err) => {
            tracing::warn!(error = %err, "bookmark persistence failed");
            return AppError::internal(err).into_response();
        }
    };

    Json(SuccessResponse::new(TranslationResponse {
        translation: best_guess.translation,
        bookmark_id: bookmark.id,
        source: best_guess.source,
        likelihood: best_guess.likelihood,
    }))
    .into_response()
}

/// Ranked alternative translations, filtered but never persisted.
pub async fn get_multiple_translations(
    State(state): State<AppState>,
    Path((from_lang, to_lang)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<AlternativesRequest>,
) -> Response {
    if let Err(err) = require_user(&state, &headers).await {
        return err.into_response();
    }

    let word = strip_punctuation(&body.word);
    if word.is_empty() {
        return AppError::bad_request("word is required").into_response();
    }

    let number_of_results = body.number_of_results.unwrap_or(DEFAULT_ALTERNATIVES);
    let query = TranslationQuery {
        word: word.to_string(),
        from_lang,
        to_lang,
        context: body.context.trim().to_string(),
    };

    let candidates = match state.translator().translate(&query, number_of_results) {
        Ok(candidates) => candidates,
        Err(err) => {
            tracing::warn!(error = %err, "translation lookup failed");
            return AppError::service_unavailable("translation service unavailable")
                .into_response();
        }
    };

    let exclude_results: Vec<String> = body.translation_to_exclude.into_iter().collect();
    let exclude_services: Vec<String> = body.service_to_exclude.into_iter().collect();
    let translations = translator::filter_candidates(
        candidates,
        &exclude_results,
        &exclude_services,
        &state.profanity(),
    );

    Json(SuccessResponse::new(AlternativesResponse { translations })).into_response()
}

/// Context-free phrase translation; nothing is persisted.
pub async fn basic_translate(
    State(state): State<AppState>,
    Path((from_lang, to_lang)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<BasicTranslateRequest>,
) -> Response {
    if let Err(err) = require_user(&state, &headers).await {
        return err.into_response();
    }

    let phrase = strip_punctuation(&body.phrase);
    if phrase.is_empty() {
        return AppError::bad_request("phrase is required").into_response();
    }

    let query = TranslationQuery {
        word: phrase.to_string(),
        from_lang,
        to_lang,
        context: String::new(),
    };
    let best_guess = match state.translator().best_guess(&query) {
        Ok(candidate) => candidate,
        Err(err) => {
            tracing::warn!(error = %err, "translation lookup failed");
            return AppError::service_unavailable("translation service unavailable")
                .into_response();
        }
    };

    Json(SuccessResponse::new(BasicTranslationResponse {
        translation: best_guess.translation,
        source: best_guess.source,
        likelihood: best_guess.likelihood,
    }))
    .into_response()
}

/// User-contributed translation for a word in context.
pub async fn contribute_translation(
    State(state): State<AppState>,
    Path((from_lang, to_lang)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<ContributeRequest>,
) -> Response {
    let (user, pool) = match require_user(&state, &headers).await {
        Ok(value) => value,
        Err(err) => return err.into_response(),
    };

    let word = unquote_plus(&body.word);
    if word.trim().is_empty() || body.translation.trim().is_empty() {
        return AppError::bad_request("word and translation are required").into_response();
    }

    let service_name = body.service_name.as_deref().unwrap_or("MANUAL");

    let bookmark = match bookmarks::find_or_create(
        &pool,
        &user.id,
        &word,
        &from_lang,
        &body.translation,
        &to_lang,
        body.context.trim(),
        body.article_id.as_deref(),
    )
    .await
    {
        Ok(bookmark) => bookmark,
        Err(err) => {
            tracing::warn!(error = %err, "bookmark persistence failed");
            return AppError::internal(err).into_response();
        }
    };

    tracing::info!(
        word = %word,
        translation = %body.translation,
        service = %service_name,
        "translation contributed"
    );

    Json(SuccessResponse::new(BookmarkIdResponse {
        bookmark_id: bookmark.id,
    }))
    .into_response()
}

/// Rewrites a bookmark's word, translation and context.
pub async fn update_bookmark_translation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateBookmarkRequest>,
) -> Response {
    let (user, pool) = match require_user(&state, &headers).await {
        Ok(value) => value,
        Err(err) => return err.into_response(),
    };

    let decoded = unquote_plus(&body.word);
    let word = strip_punctuation(&decoded);
    if word.is_empty() || body.translation.trim().is_empty() {
        return AppError::bad_request("word and translation are required").into_response();
    }

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

    if let Err(err) =
        bookmarks::update_translation(&pool, &id, word, &body.translation, body.context.trim())
            .await
    {
        tracing::warn!(error = %err, "bookmark update failed");
        return AppError::internal(err).into_response();
    }

    Json(SuccessResponse::new(BookmarkIdResponse { bookmark_id: id })).into_response()
}

/// Trims the punctuation readers select along with a word, including the
/// guillemets common in the supported languages.
fn strip_punctuation(word: &str) -> &str {
    word.trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() || c == '»' || c == '«')
}

/// Decodes form-style encoding where `+` stands for a space.
fn unquote_plus(value: &str) -> String {
    let with_spaces = value.replace('+', " ");
    match urlencoding::decode(&with_spaces) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => with_spaces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_stripped_from_both_ends() {
        assert_eq!(strip_punctuation("  »Haus«, "), "Haus");
        assert_eq!(strip_punctuation("don't"), "don't");
        assert_eq!(strip_punctuation("..."), "");
    }

    #[test]
    fn unquote_plus_decodes_form_words() {
        assert_eq!(unquote_plus("guten+Morgen"), "guten Morgen");
        assert_eq!(unquote_plus("na%C3%AFve"), "naïve");
        assert_eq!(unquote_plus("plain"), "plain");
    }
}
