use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// One word-in-context translation a user saved while reading.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub origin: String,
    pub origin_lang: String,
    pub translation: String,
    pub translation_lang: String,
    pub context: String,
    pub article_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

const BOOKMARK_COLUMNS: &str = r#""id", "userId", "origin", "originLang", "translation",
    "translationLang", "context", "articleId", "createdAt", "updatedAt""#;

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Bookmark>, String> {
    let row = sqlx::query(&format!(
        r#"SELECT {BOOKMARK_COLUMNS} FROM "bookmarks" WHERE "id" = $1"#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("bookmark query failed: {e}"))?;

    let Some(row) = row else { return Ok(None) };
    Ok(Some(parse_bookmark(&row)?))
}

/// The user's earlier translation of the same word in the same context,
/// if any. This is the "best guess" shortcut before asking a translator.
pub async fn find_own_past_translation(
    pool: &PgPool,
    user_id: &str,
    origin: &str,
    origin_lang: &str,
    translation_lang: &str,
    context: &str,
) -> Result<Option<Bookmark>, String> {
    let row = sqlx::query(&format!(
        r#"SELECT {BOOKMARK_COLUMNS} FROM "bookmarks"
           WHERE "userId" = $1 AND "origin" = $2 AND "originLang" = $3
             AND "translationLang" = $4 AND "context" = $5
           ORDER BY "updatedAt" DESC LIMIT 1"#
    ))
    .bind(user_id)
    .bind(origin)
    .bind(origin_lang)
    .bind(translation_lang)
    .bind(context)
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("bookmark query failed: {e}"))?;

    let Some(row) = row else { return Ok(None) };
    Ok(Some(parse_bookmark(&row)?))
}

#[allow(clippy::too_many_arguments)]
pub async fn find_or_create(
    pool: &PgPool,
    user_id: &str,
    origin: &str,
    origin_lang: &str,
    translation: &str,
    translation_lang: &str,
    context: &str,
    article_id: Option<&str>,
) -> Result<Bookmark, String> {
    let existing = sqlx::query(&format!(
        r#"SELECT {BOOKMARK_COLUMNS} FROM "bookmarks"
           WHERE "userId" = $1 AND "origin" = $2 AND "originLang" = $3
             AND "translation" = $4 AND "translationLang" = $5 AND "context" = $6
           LIMIT 1"#
    ))
    .bind(user_id)
    .bind(origin)
    .bind(origin_lang)
    .bind(translation)
    .bind(translation_lang)
    .bind(context)
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("bookmark query failed: {e}"))?;

    if let Some(row) = existing {
        return parse_bookmark(&row);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().naive_utc();

    let row = sqlx::query(&format!(
        r#"INSERT INTO "bookmarks"
           ("id", "userId", "origin", "originLang", "translation", "translationLang",
            "context", "articleId", "createdAt", "updatedAt")
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
           RETURNING {BOOKMARK_COLUMNS}"#
    ))
    .bind(&id)
    .bind(user_id)
    .bind(origin)
    .bind(origin_lang)
    .bind(translation)
    .bind(translation_lang)
    .bind(context)
    .bind(article_id)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| format!("bookmark insert failed: {e}"))?;

    parse_bookmark(&row)
}

pub async fn update_translation(
    pool: &PgPool,
    id: &str,
    origin: &str,
    translation: &str,
    context: &str,
) -> Result<(), String> {
    sqlx::query(
        r#"UPDATE "bookmarks"
           SET "origin" = $2, "translation" = $3, "context" = $4, "updatedAt" = $5
           WHERE "id" = $1"#,
    )
    .bind(id)
    .bind(origin)
    .bind(translation)
    .bind(context)
    .bind(Utc::now().naive_utc())
    .execute(pool)
    .await
    .map_err(|e| format!("bookmark update failed: {e}"))?;

    Ok(())
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<Bookmark>, String> {
    let rows = sqlx::query(&format!(
        r#"SELECT {BOOKMARK_COLUMNS} FROM "bookmarks"
           WHERE "userId" = $1
           ORDER BY "updatedAt" DESC LIMIT $2"#
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| format!("bookmark query failed: {e}"))?;

    rows.iter().map(parse_bookmark).collect()
}

fn parse_bookmark(row: &PgRow) -> Result<Bookmark, String> {
    Ok(Bookmark {
        id: row
            .try_get("id")
            .map_err(|e| format!("bookmark parse failed: {e}"))?,
        user_id: row
            .try_get("userId")
            .map_err(|e| format!("bookmark parse failed: {e}"))?,
        origin: row
            .try_get("origin")
            .map_err(|e| format!("bookmark parse failed: {e}"))?,
        origin_lang: row
            .try_get("originLang")
            .map_err(|e| format!("bookmark parse failed: {e}"))?,
        translation: row
            .try_get("translation")
            .map_err(|e| format!("bookmark parse failed: {e}"))?,
        translation_lang: row
            .try_get("translationLang")
            .map_err(|e| format!("bookmark parse failed: {e}"))?,
        context: row.try_get("context").unwrap_or_default(),
        article_id: row.try_get::<Option<String>, _>("articleId").ok().flatten(),
        created_at: naive_to_ms(
            row.try_get("createdAt")
                .map_err(|e| format!("bookmark parse failed: {e}"))?,
        ),
        updated_at: naive_to_ms(
            row.try_get("updatedAt")
                .map_err(|e| format!("bookmark parse failed: {e}"))?,
        ),
    })
}

fn naive_to_ms(value: NaiveDateTime) -> i64 {
    DateTime::<Utc>::from_naive_utc_and_offset(value, Utc).timestamp_millis()
}
