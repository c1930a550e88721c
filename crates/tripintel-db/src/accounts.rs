//! Database operations for the `accounts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `accounts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub public_id: Uuid,
    pub handle: String,
    pub display_name: String,
    pub platform: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

const ACCOUNT_COLUMNS: &str = "id, public_id, handle, display_name, platform, notes, \
                               is_active, created_at, updated_at, deleted_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active, non-deleted accounts, ordered by handle.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_accounts(pool: &PgPool) -> Result<Vec<AccountRow>, DbError> {
    let rows = sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} \
         FROM accounts \
         WHERE is_active = true AND deleted_at IS NULL \
         ORDER BY handle"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns all non-deleted accounts (active or not), ordered by handle.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_accounts(pool: &PgPool) -> Result<Vec<AccountRow>, DbError> {
    let rows = sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} \
         FROM accounts \
         WHERE deleted_at IS NULL \
         ORDER BY handle"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single non-deleted account by handle, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_account_by_handle(
    pool: &PgPool,
    handle: &str,
) -> Result<Option<AccountRow>, DbError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} \
         FROM accounts \
         WHERE handle = $1 AND deleted_at IS NULL"
    ))
    .bind(handle)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
