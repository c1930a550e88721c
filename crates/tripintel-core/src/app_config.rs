use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub accounts_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Origin the profile scraper talks to; overridable for tests.
    pub scraper_base_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Posts requested per page from the profile endpoint.
    pub scraper_page_size: u32,
    /// Page cap for deep-scan pagination.
    pub scraper_max_pages: usize,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    pub ingest_max_concurrent_accounts: usize,
    /// Bounds for the randomized delay between per-account scrapes.
    pub ingest_min_delay_secs: u64,
    pub ingest_max_delay_secs: u64,
    /// Cron expression for the recurring ingestion job.
    pub ingest_cron: String,
    pub feeds_cache_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("accounts_path", &self.accounts_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("scraper_base_url", &self.scraper_base_url)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_page_size", &self.scraper_page_size)
            .field("scraper_max_pages", &self.scraper_max_pages)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .field(
                "ingest_max_concurrent_accounts",
                &self.ingest_max_concurrent_accounts,
            )
            .field("ingest_min_delay_secs", &self.ingest_min_delay_secs)
            .field("ingest_max_delay_secs", &self.ingest_max_delay_secs)
            .field("ingest_cron", &self.ingest_cron)
            .field("feeds_cache_ttl_secs", &self.feeds_cache_ttl_secs)
            .finish()
    }
}
