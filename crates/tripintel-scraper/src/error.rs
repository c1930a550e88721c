use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited while fetching @{username} (retry after {retry_after_secs}s)")]
    RateLimited {
        username: String,
        retry_after_secs: u64,
    },

    #[error("blocked by upstream while fetching @{username}: received a login wall instead of JSON")]
    Blocked { username: String },

    #[error("profile not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached for @{username}: exceeded {max_pages} pages")]
    PaginationLimit { username: String, max_pages: usize },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
