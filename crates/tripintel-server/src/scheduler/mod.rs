//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring ingestion job.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use tripintel_ingest::{run_ingestion, IngestError, IngestOptions};

/// Builds and starts the background job scheduler.
///
/// Registers the recurring ingestion job and starts the scheduler. Returns
/// the running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<tripintel_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_ingestion_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the recurring account-ingestion job.
///
/// The schedule comes from `TRIPINTEL_INGEST_CRON` (six-field cron, default
/// every six hours). Each firing runs a shallow ingestion over all active
/// accounts; a firing that overlaps a run already in progress is skipped.
async fn register_ingestion_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<tripintel_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);
    // The closure takes ownership of config, so the schedule needs its own copy.
    let cron = config.ingest_cron.clone();

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting scheduled ingestion run");
            run_scheduled_ingestion(&pool, &config).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn run_scheduled_ingestion(pool: &PgPool, config: &tripintel_core::AppConfig) {
    let opts = IngestOptions {
        account: None,
        deep: false,
        trigger_source: "scheduler",
    };

    match run_ingestion(pool, config, &opts).await {
        Ok(summary) => {
            tracing::info!(
                run_id = summary.run_id,
                status = %summary.status,
                accounts = summary.accounts_processed,
                posts = summary.posts_collected,
                offers = summary.offers_detected,
                "scheduler: ingestion run finished"
            );
        }
        Err(IngestError::AlreadyRunning) => {
            tracing::warn!("scheduler: ingestion already in progress; skipping this firing");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: ingestion run failed");
        }
    }
}
