//! Database operations for the `offers` table.
//!
//! Offers are derived rows: one per post, regenerated whenever the post's
//! caption is reprocessed. The upsert keys on `post_id` so reprocessing
//! overwrites in place rather than accumulating history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `offers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfferRow {
    pub id: i64,
    pub post_id: i64,
    pub destination: Option<String>,
    pub price: Option<Decimal>,
    pub currency_code: Option<String>,
    pub duration_nights: Option<i32>,
    pub hotel: Option<String>,
    pub contact_phone: Option<String>,
    pub confidence: f32,
    pub detected_at: DateTime<Utc>,
}

/// A detected offer ready for persistence.
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub destination: Option<String>,
    pub price: Option<Decimal>,
    pub currency_code: Option<String>,
    pub duration_nights: Option<i32>,
    pub hotel: Option<String>,
    pub contact_phone: Option<String>,
    pub confidence: f32,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Upserts the offer for a post, replacing any previous detection.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_offer(pool: &PgPool, post_id: i64, offer: &NewOffer) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO offers \
             (post_id, destination, price, currency_code, duration_nights, \
              hotel, contact_phone, confidence) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (post_id) DO UPDATE SET \
             destination     = EXCLUDED.destination, \
             price           = EXCLUDED.price, \
             currency_code   = EXCLUDED.currency_code, \
             duration_nights = EXCLUDED.duration_nights, \
             hotel           = EXCLUDED.hotel, \
             contact_phone   = EXCLUDED.contact_phone, \
             confidence      = EXCLUDED.confidence, \
             detected_at     = NOW() \
         RETURNING id",
    )
    .bind(post_id)
    .bind(&offer.destination)
    .bind(offer.price)
    .bind(&offer.currency_code)
    .bind(offer.duration_nights)
    .bind(&offer.hotel)
    .bind(&offer.contact_phone)
    .bind(offer.confidence)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns recent offers, optionally filtered by account handle and a
/// minimum confidence, joined with their posts for ordering.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_offers(
    pool: &PgPool,
    account_handle: Option<&str>,
    min_confidence: Option<f32>,
    limit: i64,
) -> Result<Vec<OfferRow>, DbError> {
    let rows = sqlx::query_as::<_, OfferRow>(
        "SELECT o.id, o.post_id, o.destination, o.price, o.currency_code, \
                o.duration_nights, o.hotel, o.contact_phone, o.confidence, o.detected_at \
         FROM offers o \
         JOIN posts p ON p.id = o.post_id \
         JOIN accounts a ON a.id = p.account_id \
         WHERE ($1::text IS NULL OR a.handle = $1) \
           AND ($2::real IS NULL OR o.confidence >= $2) \
         ORDER BY o.detected_at DESC, o.id DESC \
         LIMIT $3",
    )
    .bind(account_handle)
    .bind(min_confidence)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
