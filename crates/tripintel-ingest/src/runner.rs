//! Orchestration of a single ingestion run: scrape → detect → persist.

use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use uuid::Uuid;

use tripintel_core::AppConfig;
use tripintel_db::{NewOffer, RunCounts};
use tripintel_detect::OfferDetection;
use tripintel_scraper::{FetchOptions, NormalizedPost, ProfileClient};

use crate::{lock, IngestError};

/// Delay between pages of a single profile during a deep scan.
const INTER_PAGE_DELAY_MS: u64 = 1_500;

/// Options for a single ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Restrict the run to one account handle instead of all active accounts.
    pub account: Option<String>,
    /// Deep scan: follow pagination up to the configured page cap instead of
    /// fetching only the first page.
    pub deep: bool,
    /// Recorded on the run row: `"cli"`, `"api"`, or `"scheduler"`.
    pub trigger_source: &'static str,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            account: None,
            deep: false,
            trigger_source: "cli",
        }
    }
}

/// Aggregated result of a completed ingestion run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: i64,
    pub public_id: Uuid,
    /// Terminal run status: `succeeded` or `partial`.
    pub status: String,
    pub accounts_processed: i32,
    pub posts_collected: i32,
    pub offers_detected: i32,
    /// One message per account that failed, in completion order.
    pub errors: Vec<String>,
}

/// Executes one full ingestion run across the tracked accounts.
///
/// Takes the process-wide run lock for the duration of the run; a concurrent
/// invocation gets [`IngestError::AlreadyRunning`] without touching the
/// database. Per-account failures are recorded on the run's account rows and
/// downgrade the run to `partial`; only an all-accounts failure (or a failure
/// of the run bookkeeping itself) is an error.
///
/// # Errors
///
/// Returns [`IngestError::AlreadyRunning`] when another run holds the lock,
/// [`IngestError::AccountNotFound`] for an unknown `--account` filter,
/// [`IngestError::NoAccounts`] when nothing is active, and
/// [`IngestError::AllAccountsFailed`] when every account errored.
pub async fn run_ingestion(
    pool: &PgPool,
    config: &AppConfig,
    opts: &IngestOptions,
) -> Result<RunSummary, IngestError> {
    let _lock = lock::try_acquire().ok_or(IngestError::AlreadyRunning)?;

    let accounts = load_accounts_for_ingest(pool, opts.account.as_deref()).await?;
    if accounts.is_empty() {
        return Err(IngestError::NoAccounts);
    }

    let client = ProfileClient::new(
        &config.scraper_base_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )?;

    let run_type = if opts.deep { "deep" } else { "recent" };
    let run = tripintel_db::create_ingestion_run(pool, run_type, opts.trigger_source).await?;
    if let Err(e) = tripintel_db::start_ingestion_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, RunCounts::default(), &e.to_string()).await;
        return Err(e.into());
    }

    tracing::info!(
        run_id = run.id,
        run_type,
        accounts = accounts.len(),
        trigger = opts.trigger_source,
        "ingestion run started"
    );

    let max_concurrent = config.ingest_max_concurrent_accounts.max(1);
    let total_accounts = accounts.len();
    // Owned rows: borrowed rows would pin the stream futures to the loop
    // lifetime and the run future could no longer cross task boundaries.
    let results: Vec<(tripintel_db::AccountRow, Result<AccountOutcome, tripintel_db::DbError>)> =
        stream::iter(accounts)
            .map(|account| {
                let client = &client;
                async move {
                    let outcome =
                        process_account(pool, client, config, run.id, &account, opts.deep).await;
                    (account, outcome)
                }
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;

    let mut counts = RunCounts::default();
    let mut errors: Vec<String> = Vec::new();

    for (account, result) in results {
        match result {
            Ok(outcome) => {
                counts.posts_collected = counts.posts_collected.saturating_add(outcome.posts);
                counts.offers_detected = counts.offers_detected.saturating_add(outcome.offers);
                match outcome.error {
                    None => {
                        counts.accounts_processed = counts.accounts_processed.saturating_add(1);
                    }
                    Some(message) => errors.push(format!("{}: {message}", account.handle)),
                }
            }
            Err(e) => {
                tracing::error!(
                    handle = %account.handle,
                    error = %e,
                    "unexpected error ingesting account"
                );
                errors.push(format!("{}: {e}", account.handle));
            }
        }
    }

    if !errors.is_empty() {
        tracing::warn!(
            failed_accounts = errors.len(),
            total_accounts,
            "some accounts failed during ingestion"
        );
    }

    if errors.len() == total_accounts {
        let message = format!("all {} accounts failed ingestion", errors.len());
        fail_run_best_effort(pool, run.id, counts, &message).await;
        return Err(IngestError::AllAccountsFailed {
            failed: errors.len(),
        });
    }

    let status = if errors.is_empty() {
        "succeeded"
    } else {
        "partial"
    };
    if let Err(e) = tripintel_db::complete_ingestion_run(pool, run.id, status, counts).await {
        fail_run_best_effort(pool, run.id, counts, &e.to_string()).await;
        return Err(e.into());
    }

    tracing::info!(
        run_id = run.id,
        status,
        accounts_processed = counts.accounts_processed,
        posts_collected = counts.posts_collected,
        offers_detected = counts.offers_detected,
        "ingestion run finished"
    );

    Ok(RunSummary {
        run_id: run.id,
        public_id: run.public_id,
        status: status.to_string(),
        accounts_processed: counts.accounts_processed,
        posts_collected: counts.posts_collected,
        offers_detected: counts.offers_detected,
        errors,
    })
}

/// Result of processing one account. `error` is `Some` when the account
/// failed after its failure row was already recorded; counts reflect whatever
/// was persisted before the failure.
struct AccountOutcome {
    posts: i32,
    offers: i32,
    error: Option<String>,
}

/// Resolves the accounts to process: a single handle when filtered, otherwise
/// every active account.
async fn load_accounts_for_ingest(
    pool: &PgPool,
    handle_filter: Option<&str>,
) -> Result<Vec<tripintel_db::AccountRow>, IngestError> {
    match handle_filter {
        Some(handle) => {
            let account = tripintel_db::get_account_by_handle(pool, handle)
                .await?
                .ok_or_else(|| IngestError::AccountNotFound {
                    handle: handle.to_string(),
                })?;
            Ok(vec![account])
        }
        None => Ok(tripintel_db::list_active_accounts(pool).await?),
    }
}

/// Scrapes one account and persists its posts and detected offers.
///
/// Sleeps a randomized delay first so concurrent account tasks do not hammer
/// the upstream in lockstep. Fetch and persistence failures are recorded on
/// the account's run row and reported via [`AccountOutcome::error`]; only a
/// failure to write the bookkeeping row itself propagates as `Err`.
async fn process_account(
    pool: &PgPool,
    client: &ProfileClient,
    config: &AppConfig,
    run_id: i64,
    account: &tripintel_db::AccountRow,
    deep: bool,
) -> Result<AccountOutcome, tripintel_db::DbError> {
    let delay = tripintel_scraper::jitter_delay(
        config.ingest_min_delay_secs,
        config.ingest_max_delay_secs,
    );
    tokio::time::sleep(delay).await;

    let fetch_opts = FetchOptions {
        page_size: config.scraper_page_size,
        max_pages: if deep { config.scraper_max_pages } else { 1 },
        inter_page_delay_ms: INTER_PAGE_DELAY_MS,
    };

    let posts = match client.fetch_recent_posts(&account.handle, &fetch_opts).await {
        Ok(posts) => posts,
        Err(e) => {
            let message = e.to_string();
            tracing::error!(
                handle = %account.handle,
                error = %message,
                "failed to fetch posts for account"
            );
            tripintel_db::upsert_ingestion_run_account(
                pool,
                run_id,
                account.id,
                "failed",
                0,
                0,
                Some(&message),
            )
            .await?;
            return Ok(AccountOutcome {
                posts: 0,
                offers: 0,
                error: Some(message),
            });
        }
    };

    match persist_posts(pool, account.id, &posts).await {
        Ok((posts_collected, offers_detected)) => {
            tripintel_db::upsert_ingestion_run_account(
                pool,
                run_id,
                account.id,
                "succeeded",
                posts_collected,
                offers_detected,
                None,
            )
            .await?;
            tracing::debug!(
                handle = %account.handle,
                posts = posts_collected,
                offers = offers_detected,
                "account ingested"
            );
            Ok(AccountOutcome {
                posts: posts_collected,
                offers: offers_detected,
                error: None,
            })
        }
        Err((posts_collected, offers_detected, e)) => {
            let message = e.to_string();
            tracing::error!(
                handle = %account.handle,
                error = %message,
                "db error persisting account posts"
            );
            tripintel_db::upsert_ingestion_run_account(
                pool,
                run_id,
                account.id,
                "failed",
                posts_collected,
                offers_detected,
                Some(&message),
            )
            .await?;
            Ok(AccountOutcome {
                posts: posts_collected,
                offers: offers_detected,
                error: Some(message),
            })
        }
    }
}

/// Upserts posts and their detected offers for a single account.
///
/// On a database error the counts persisted so far accompany the error so
/// the caller can record partial progress.
async fn persist_posts(
    pool: &PgPool,
    account_id: i64,
    posts: &[NormalizedPost],
) -> Result<(i32, i32), (i32, i32, tripintel_db::DbError)> {
    let mut posts_collected: i32 = 0;
    let mut offers_detected: i32 = 0;

    for post in posts {
        let new_post = tripintel_db::NewPost {
            platform_post_id: post.platform_post_id.clone(),
            url: post.url.clone(),
            caption: post.caption.clone(),
            media_urls: post.media_urls.clone(),
            posted_at: post.posted_at,
            like_count: post.like_count,
            comment_count: post.comment_count,
            caption_fingerprint: post.caption_fingerprint.clone(),
        };
        let (post_id, _inserted) = tripintel_db::upsert_post(pool, account_id, &new_post)
            .await
            .map_err(|e| (posts_collected, offers_detected, e))?;
        posts_collected = posts_collected.saturating_add(1);

        let detection = tripintel_detect::detect_offer(post.caption.as_deref().unwrap_or(""));
        if !detection.is_empty() {
            tripintel_db::upsert_offer(pool, post_id, &offer_from_detection(detection))
                .await
                .map_err(|e| (posts_collected, offers_detected, e))?;
            offers_detected = offers_detected.saturating_add(1);
        }
    }

    Ok((posts_collected, offers_detected))
}

fn offer_from_detection(detection: OfferDetection) -> NewOffer {
    NewOffer {
        destination: detection.destination,
        price: detection.price,
        currency_code: detection.currency_code,
        duration_nights: detection.duration_nights,
        hotel: detection.hotel,
        contact_phone: detection.contact_phone,
        confidence: detection.confidence,
    }
}

/// Attempt to mark a run as failed, logging any secondary error.
async fn fail_run_best_effort(pool: &PgPool, run_id: i64, counts: RunCounts, message: &str) {
    if let Err(mark_err) = tripintel_db::fail_ingestion_run(pool, run_id, counts, message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark ingestion run as failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // connect_lazy never opens a connection; the lock check fires before any
    // query, so no database is needed here.
    fn lazy_pool() -> PgPool {
        PgPool::connect_lazy("postgres://localhost/unused").unwrap()
    }

    fn test_config() -> AppConfig {
        use std::path::PathBuf;
        use tripintel_core::Environment;

        AppConfig {
            database_url: "postgres://localhost/unused".to_string(),
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            accounts_path: PathBuf::from("./config/accounts.yaml"),
            db_max_connections: 1,
            db_min_connections: 0,
            db_acquire_timeout_secs: 1,
            scraper_base_url: "http://127.0.0.1:9".to_string(),
            scraper_request_timeout_secs: 1,
            scraper_user_agent: "tripintel-test/0.1".to_string(),
            scraper_page_size: 12,
            scraper_max_pages: 1,
            scraper_max_retries: 0,
            scraper_retry_backoff_base_secs: 0,
            ingest_max_concurrent_accounts: 1,
            ingest_min_delay_secs: 0,
            ingest_max_delay_secs: 0,
            ingest_cron: "0 0 */6 * * *".to_string(),
            feeds_cache_ttl_secs: 300,
        }
    }

    #[tokio::test]
    async fn second_invocation_is_rejected_while_lock_held() {
        let _serial = lock::TEST_SERIAL
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _guard = lock::try_acquire().expect("lock free at test start");

        let result = run_ingestion(&lazy_pool(), &test_config(), &IngestOptions::default()).await;
        assert!(
            matches!(result, Err(IngestError::AlreadyRunning)),
            "expected AlreadyRunning, got: {result:?}"
        );
    }

    // The run future crosses task boundaries (axum handlers, cron jobs); a
    // borrow of the account list inside the batch stream breaks that.
    #[tokio::test]
    async fn run_future_is_send() {
        fn assert_send<T: Send>(_: T) {}

        let pool = lazy_pool();
        let config = test_config();
        let opts = IngestOptions::default();
        assert_send(run_ingestion(&pool, &config, &opts));
    }

    #[test]
    fn default_options_target_all_accounts_shallow() {
        let opts = IngestOptions::default();
        assert!(opts.account.is_none());
        assert!(!opts.deep);
        assert_eq!(opts.trigger_source, "cli");
    }
}
