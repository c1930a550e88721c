//! Database operations for `ingestion_runs` and `ingestion_run_accounts`.
//!
//! Run status lifecycle: `queued` → `running` → `succeeded` | `partial` |
//! `failed`. `partial` means the run finished but some accounts failed;
//! counts reflect whatever was persisted before the failure.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `ingestion_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngestionRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub run_type: String,
    pub trigger_source: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub accounts_processed: i32,
    pub posts_collected: i32,
    pub offers_detected: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `ingestion_run_accounts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IngestionRunAccountRow {
    pub id: i64,
    pub ingestion_run_id: i64,
    pub account_id: i64,
    pub status: String,
    pub posts_collected: i32,
    pub offers_detected: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Final counts written when a run completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCounts {
    pub accounts_processed: i32,
    pub posts_collected: i32,
    pub offers_detected: i32,
}

const RUN_COLUMNS: &str = "id, public_id, run_type, trigger_source, status, \
                           started_at, completed_at, accounts_processed, \
                           posts_collected, offers_detected, error_message, created_at";

// ---------------------------------------------------------------------------
// ingestion_runs operations
// ---------------------------------------------------------------------------

/// Creates a new ingestion run in `queued` status.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or fetch fails.
pub async fn create_ingestion_run(
    pool: &PgPool,
    run_type: &str,
    trigger_source: &str,
) -> Result<IngestionRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, IngestionRunRow>(&format!(
        "INSERT INTO ingestion_runs (public_id, run_type, trigger_source, status) \
         VALUES ($1, $2, $3, 'queued') \
         RETURNING {RUN_COLUMNS}"
    ))
    .bind(public_id)
    .bind(run_type)
    .bind(trigger_source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `running` and sets `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `queued`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn start_ingestion_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE ingestion_runs \
         SET status = 'running', started_at = NOW() \
         WHERE id = $1 AND status = 'queued'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "queued",
        });
    }

    Ok(())
}

/// Marks a run as finished with the given terminal `status` (`succeeded` or
/// `partial`), sets `completed_at = NOW()` and the final counts.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn complete_ingestion_run(
    pool: &PgPool,
    id: i64,
    status: &str,
    counts: RunCounts,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE ingestion_runs \
         SET status = $1, completed_at = NOW(), \
             accounts_processed = $2, posts_collected = $3, offers_detected = $4 \
         WHERE id = $5 AND status = 'running'",
    )
    .bind(status)
    .bind(counts.accounts_processed)
    .bind(counts.posts_collected)
    .bind(counts.offers_detected)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed`, sets `completed_at = NOW()`, the partial counts
/// collected so far, and `error_message`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn fail_ingestion_run(
    pool: &PgPool,
    id: i64,
    counts: RunCounts,
    error_message: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE ingestion_runs \
         SET status = 'failed', completed_at = NOW(), \
             accounts_processed = $1, posts_collected = $2, offers_detected = $3, \
             error_message = $4 \
         WHERE id = $5 AND status = 'running'",
    )
    .bind(counts.accounts_processed)
    .bind(counts.posts_collected)
    .bind(counts.offers_detected)
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by its internal `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_ingestion_run(pool: &PgPool, id: i64) -> Result<IngestionRunRow, DbError> {
    let row = sqlx::query_as::<_, IngestionRunRow>(&format!(
        "SELECT {RUN_COLUMNS} \
         FROM ingestion_runs \
         WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` runs, ordered by `created_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ingestion_runs(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<IngestionRunRow>, DbError> {
    let rows = sqlx::query_as::<_, IngestionRunRow>(&format!(
        "SELECT {RUN_COLUMNS} \
         FROM ingestion_runs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// ingestion_run_accounts operations
// ---------------------------------------------------------------------------

/// Inserts or updates the per-account result row for an ingestion run.
///
/// Conflicts on `(ingestion_run_id, account_id)` update `status`, the counts,
/// and `error_message` in place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_ingestion_run_account(
    pool: &PgPool,
    run_id: i64,
    account_id: i64,
    status: &str,
    posts_collected: i32,
    offers_detected: i32,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO ingestion_run_accounts \
             (ingestion_run_id, account_id, status, posts_collected, offers_detected, error_message) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (ingestion_run_id, account_id) DO UPDATE SET \
             status          = EXCLUDED.status, \
             posts_collected = EXCLUDED.posts_collected, \
             offers_detected = EXCLUDED.offers_detected, \
             error_message   = EXCLUDED.error_message",
    )
    .bind(run_id)
    .bind(account_id)
    .bind(status)
    .bind(posts_collected)
    .bind(offers_detected)
    .bind(error_message)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns all account-level result rows for a given ingestion run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ingestion_run_accounts(
    pool: &PgPool,
    run_id: i64,
) -> Result<Vec<IngestionRunAccountRow>, DbError> {
    let rows = sqlx::query_as::<_, IngestionRunAccountRow>(
        "SELECT id, ingestion_run_id, account_id, status, posts_collected, \
                offers_detected, error_message, created_at \
         FROM ingestion_run_accounts \
         WHERE ingestion_run_id = $1",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
