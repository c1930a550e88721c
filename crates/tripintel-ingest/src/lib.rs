//! Ingestion orchestrator: scrape tracked accounts, detect offers, persist.
//!
//! One run at a time per process ([`lock`]); every run leaves an audit row in
//! `ingestion_runs` plus per-account rows in `ingestion_run_accounts`, so a
//! crashed or partial run is visible after the fact.

mod lock;
mod runner;

pub use lock::{try_acquire, RunLock};
pub use runner::{run_ingestion, IngestOptions, RunSummary};

/// Errors surfaced by [`run_ingestion`].
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Another ingestion run already holds the process-wide lock.
    #[error("an ingestion run is already in progress")]
    AlreadyRunning,

    #[error("account '{handle}' not found")]
    AccountNotFound { handle: String },

    #[error("no active accounts to ingest")]
    NoAccounts,

    #[error("all {failed} accounts failed ingestion")]
    AllAccountsFailed { failed: usize },

    #[error(transparent)]
    Db(#[from] tripintel_db::DbError),

    #[error(transparent)]
    Scraper(#[from] tripintel_scraper::ScraperError),
}
