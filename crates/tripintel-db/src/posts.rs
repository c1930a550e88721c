//! Database operations for the `posts` table.

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub account_id: i64,
    pub platform_post_id: String,
    pub url: String,
    pub caption: Option<String>,
    pub media_urls: serde_json::Value,
    pub posted_at: Option<DateTime<Utc>>,
    pub like_count: i32,
    pub comment_count: i32,
    pub caption_fingerprint: Option<String>,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// A scraped post ready for persistence.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub platform_post_id: String,
    pub url: String,
    pub caption: Option<String>,
    pub media_urls: Vec<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub like_count: i32,
    pub comment_count: i32,
    /// SHA-256 hex digest of the caption, used to detect caption edits.
    pub caption_fingerprint: Option<String>,
}

const POST_COLUMNS: &str = "id, account_id, platform_post_id, url, caption, media_urls, \
                            posted_at, like_count, comment_count, caption_fingerprint, \
                            first_seen_at, last_seen_at";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Upserts a post row, deduplicating on `platform_post_id`.
///
/// A conflict updates engagement counts, the caption (captions are editable
/// upstream), and `last_seen_at`; `first_seen_at` and the owning account are
/// never touched. Returns the internal `id` and whether a new row was
/// inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_post(
    pool: &PgPool,
    account_id: i64,
    post: &NewPost,
) -> Result<(i64, bool), DbError> {
    let media_urls = json!(post.media_urls);

    // `xmax = 0` distinguishes a fresh insert from a conflict-update.
    let (id, inserted): (i64, bool) = sqlx::query_as(
        "INSERT INTO posts \
             (account_id, platform_post_id, url, caption, media_urls, posted_at, \
              like_count, comment_count, caption_fingerprint) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (platform_post_id) DO UPDATE SET \
             caption             = EXCLUDED.caption, \
             media_urls          = EXCLUDED.media_urls, \
             like_count          = EXCLUDED.like_count, \
             comment_count       = EXCLUDED.comment_count, \
             caption_fingerprint = EXCLUDED.caption_fingerprint, \
             last_seen_at        = NOW() \
         RETURNING id, (xmax = 0) AS inserted",
    )
    .bind(account_id)
    .bind(&post.platform_post_id)
    .bind(&post.url)
    .bind(&post.caption)
    .bind(media_urls)
    .bind(post.posted_at)
    .bind(post.like_count)
    .bind(post.comment_count)
    .bind(&post.caption_fingerprint)
    .fetch_one(pool)
    .await?;

    Ok((id, inserted))
}

/// Returns the most recent `limit` posts for an account, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts_for_account(
    pool: &PgPool,
    account_id: i64,
    limit: i64,
) -> Result<Vec<PostRow>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} \
         FROM posts \
         WHERE account_id = $1 \
         ORDER BY posted_at DESC NULLS LAST, id DESC \
         LIMIT $2"
    ))
    .bind(account_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the most recent `limit` posts across all accounts, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_posts(pool: &PgPool, limit: i64) -> Result<Vec<PostRow>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "SELECT {POST_COLUMNS} \
         FROM posts \
         ORDER BY posted_at DESC NULLS LAST, id DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
