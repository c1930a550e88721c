//! Live integration tests for tripintel-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/tripintel-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use rust_decimal::Decimal;
use tripintel_db::{
    complete_ingestion_run, create_ingestion_run, fail_ingestion_run, get_account_by_handle,
    get_ingestion_run, list_active_accounts, list_ingestion_run_accounts, list_offers,
    list_posts_for_account, start_ingestion_run, upsert_ingestion_run_account, upsert_offer,
    upsert_post, NewOffer, NewPost, RunCounts,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a minimal account row and return its generated `id`.
async fn insert_test_account(pool: &sqlx::PgPool, handle: &str, is_active: bool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO accounts (handle, display_name, platform, is_active) \
         VALUES ($1, $2, 'instagram', $3) RETURNING id",
    )
    .bind(handle)
    .bind(format!("Test Account {handle}"))
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_account failed for handle '{handle}': {e}"))
}

fn make_post(platform_post_id: &str) -> NewPost {
    NewPost {
        platform_post_id: platform_post_id.to_string(),
        url: format!("https://www.instagram.com/p/{platform_post_id}/"),
        caption: Some("Hurghada 4 nights from 9999 EGP".to_string()),
        media_urls: vec!["https://cdn.example.com/a.jpg".to_string()],
        posted_at: None,
        like_count: 10,
        comment_count: 1,
        caption_fingerprint: Some("fp-1".to_string()),
    }
}

// ---------------------------------------------------------------------------
// accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_active_accounts_excludes_inactive(pool: sqlx::PgPool) {
    insert_test_account(&pool, "niletours", true).await;
    insert_test_account(&pool, "dormant_agency", false).await;

    let accounts = list_active_accounts(&pool).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].handle, "niletours");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_account_by_handle_round_trips(pool: sqlx::PgPool) {
    let id = insert_test_account(&pool, "sharm_deals", true).await;

    let account = get_account_by_handle(&pool, "sharm_deals")
        .await
        .unwrap()
        .expect("account should exist");
    assert_eq!(account.id, id);
    assert_eq!(account.platform, "instagram");

    assert!(get_account_by_handle(&pool, "missing")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// posts: dedup invariant
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_post_is_idempotent_by_platform_id(pool: sqlx::PgPool) {
    let account_id = insert_test_account(&pool, "niletours", true).await;
    let post = make_post("CxAbc001");

    let (first_id, inserted) = upsert_post(&pool, account_id, &post).await.unwrap();
    assert!(inserted, "first upsert should insert");

    // Same platform id with updated engagement counts.
    let mut updated = post.clone();
    updated.like_count = 55;
    let (second_id, inserted) = upsert_post(&pool, account_id, &updated).await.unwrap();
    assert!(!inserted, "second upsert should update in place");
    assert_eq!(first_id, second_id);

    let rows = list_posts_for_account(&pool, account_id, 50).await.unwrap();
    assert_eq!(rows.len(), 1, "re-ingestion must not create duplicate rows");
    assert_eq!(rows[0].like_count, 55);
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_post_preserves_first_seen_at(pool: sqlx::PgPool) {
    let account_id = insert_test_account(&pool, "niletours", true).await;
    let post = make_post("CxAbc002");

    upsert_post(&pool, account_id, &post).await.unwrap();
    let before = list_posts_for_account(&pool, account_id, 1).await.unwrap()[0].first_seen_at;

    upsert_post(&pool, account_id, &post).await.unwrap();
    let row = &list_posts_for_account(&pool, account_id, 1).await.unwrap()[0];

    assert_eq!(row.first_seen_at, before);
    assert!(row.last_seen_at >= before);
}

// ---------------------------------------------------------------------------
// offers: regenerate-on-reprocess
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_offer_overwrites_previous_detection(pool: sqlx::PgPool) {
    let account_id = insert_test_account(&pool, "niletours", true).await;
    let (post_id, _) = upsert_post(&pool, account_id, &make_post("CxAbc003"))
        .await
        .unwrap();

    let first = NewOffer {
        destination: Some("Hurghada".to_string()),
        price: Some(Decimal::new(999_900, 2)),
        currency_code: Some("EGP".to_string()),
        duration_nights: Some(4),
        hotel: None,
        contact_phone: None,
        confidence: 0.6,
    };
    let first_id = upsert_offer(&pool, post_id, &first).await.unwrap();

    let second = NewOffer {
        destination: Some("Hurghada".to_string()),
        price: Some(Decimal::new(1_250_000, 2)),
        currency_code: Some("EGP".to_string()),
        duration_nights: Some(5),
        hotel: Some("Sunrise Resort".to_string()),
        contact_phone: None,
        confidence: 0.85,
    };
    let second_id = upsert_offer(&pool, post_id, &second).await.unwrap();
    assert_eq!(first_id, second_id, "reprocessing must overwrite, not append");

    let offers = list_offers(&pool, None, None, 10).await.unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].duration_nights, Some(5));
    assert_eq!(offers[0].hotel.as_deref(), Some("Sunrise Resort"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_offers_filters_by_confidence_and_handle(pool: sqlx::PgPool) {
    let a1 = insert_test_account(&pool, "niletours", true).await;
    let a2 = insert_test_account(&pool, "sharm_deals", true).await;

    let (p1, _) = upsert_post(&pool, a1, &make_post("CxAbc010")).await.unwrap();
    let (p2, _) = upsert_post(&pool, a2, &make_post("CxAbc011")).await.unwrap();

    let low = NewOffer {
        destination: None,
        price: None,
        currency_code: None,
        duration_nights: None,
        hotel: None,
        contact_phone: None,
        confidence: 0.2,
    };
    let high = NewOffer {
        confidence: 0.9,
        ..low.clone()
    };
    upsert_offer(&pool, p1, &low).await.unwrap();
    upsert_offer(&pool, p2, &high).await.unwrap();

    let confident = list_offers(&pool, None, Some(0.5), 10).await.unwrap();
    assert_eq!(confident.len(), 1);
    assert_eq!(confident[0].post_id, p2);

    let for_account = list_offers(&pool, Some("niletours"), None, 10).await.unwrap();
    assert_eq!(for_account.len(), 1);
    assert_eq!(for_account[0].post_id, p1);
}

// ---------------------------------------------------------------------------
// ingestion runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn run_lifecycle_queued_running_succeeded(pool: sqlx::PgPool) {
    let run = create_ingestion_run(&pool, "full", "cli").await.unwrap();
    assert_eq!(run.status, "queued");

    start_ingestion_run(&pool, run.id).await.unwrap();

    let counts = RunCounts {
        accounts_processed: 3,
        posts_collected: 24,
        offers_detected: 6,
    };
    complete_ingestion_run(&pool, run.id, "succeeded", counts)
        .await
        .unwrap();

    let row = get_ingestion_run(&pool, run.id).await.unwrap();
    assert_eq!(row.status, "succeeded");
    assert_eq!(row.accounts_processed, 3);
    assert_eq!(row.posts_collected, 24);
    assert_eq!(row.offers_detected, 6);
    assert!(row.started_at.is_some());
    assert!(row.completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_run_keeps_partial_counts(pool: sqlx::PgPool) {
    let run = create_ingestion_run(&pool, "full", "scheduler").await.unwrap();
    start_ingestion_run(&pool, run.id).await.unwrap();

    let partial = RunCounts {
        accounts_processed: 1,
        posts_collected: 7,
        offers_detected: 2,
    };
    fail_ingestion_run(&pool, run.id, partial, "upstream rate limit")
        .await
        .unwrap();

    let row = get_ingestion_run(&pool, run.id).await.unwrap();
    assert_eq!(row.status, "failed");
    assert_eq!(row.posts_collected, 7);
    assert_eq!(row.error_message.as_deref(), Some("upstream rate limit"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn start_requires_queued_status(pool: sqlx::PgPool) {
    let run = create_ingestion_run(&pool, "full", "cli").await.unwrap();
    start_ingestion_run(&pool, run.id).await.unwrap();

    let result = start_ingestion_run(&pool, run.id).await;
    assert!(
        matches!(
            result,
            Err(tripintel_db::DbError::InvalidRunTransition { .. })
        ),
        "expected InvalidRunTransition, got: {result:?}"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn run_account_rows_upsert_in_place(pool: sqlx::PgPool) {
    let account_id = insert_test_account(&pool, "niletours", true).await;
    let run = create_ingestion_run(&pool, "full", "cli").await.unwrap();

    upsert_ingestion_run_account(&pool, run.id, account_id, "running", 0, 0, None)
        .await
        .unwrap();
    upsert_ingestion_run_account(&pool, run.id, account_id, "succeeded", 12, 3, None)
        .await
        .unwrap();

    let rows = list_ingestion_run_accounts(&pool, run.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "succeeded");
    assert_eq!(rows[0].posts_collected, 12);
    assert_eq!(rows[0].offers_detected, 3);
}
