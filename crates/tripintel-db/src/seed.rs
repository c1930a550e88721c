use sqlx::PgPool;
use tripintel_core::accounts::AccountConfig;

use crate::DbError;

/// Upsert tracked accounts from config into the database.
///
/// Returns the number of accounts processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// Accounts present in the database but absent from config are left alone —
/// deactivation is a manual operation, not a seed side effect.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_accounts(pool: &PgPool, accounts: &[AccountConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for account in accounts {
        let handle = account.normalized_handle();

        sqlx::query(
            "INSERT INTO accounts (handle, display_name, platform, notes, is_active) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (handle) DO UPDATE SET \
                 display_name = EXCLUDED.display_name, \
                 platform = EXCLUDED.platform, \
                 notes = EXCLUDED.notes, \
                 is_active = EXCLUDED.is_active, \
                 updated_at = NOW()",
        )
        .bind(&handle)
        .bind(&account.display_name)
        .bind(&account.platform)
        .bind(&account.notes)
        .bind(account.active)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
