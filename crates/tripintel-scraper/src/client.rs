use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::normalize::{normalize_post, NormalizedPost};
use crate::pagination::next_cursor;
use crate::types::ProfileMediaResponse;

/// Absolute page cap, independent of the configured deep-scan bound.
/// Prevents infinite loops on cycling cursors.
const MAX_PAGES: usize = 50;

/// Knobs for a single profile fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Posts requested per page.
    pub page_size: u32,
    /// Deep-scan bound: how many pages to walk before stopping. `1` fetches
    /// only the first page.
    pub max_pages: usize,
    /// Sleep between page requests (applied after every page except the first).
    pub inter_page_delay_ms: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: 12,
            max_pages: 1,
            inter_page_delay_ms: 1_500,
        }
    }
}

/// HTTP client for a public profile's undocumented media endpoint.
///
/// Handles rate limiting (429), soft blocks (HTML login wall in place of
/// JSON), not-found (404), and other non-2xx responses as typed errors.
/// Pagination cursors ride in the JSON body (`page_info.end_cursor`) and are
/// followed up to a configurable page bound.
///
/// Transient errors (429, soft block, network failures) are automatically
/// retried with exponential backoff up to `max_retries` additional attempts.
pub struct ProfileClient {
    client: Client,
    base_url: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl ProfileClient {
    /// Creates a `ProfileClient` with configured base URL, timeout,
    /// `User-Agent`, and retry policy.
    ///
    /// `base_url` is the upstream origin (`https://www.instagram.com` in
    /// production; a local mock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse
    /// as an absolute URL, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let parsed =
            reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed.origin().ascii_serialization(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// The upstream origin this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of a profile's media, with automatic retry on
    /// transient errors.
    ///
    /// Returns the parsed [`ProfileMediaResponse`] and the cursor for the
    /// next page (if one exists).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScraperError::Blocked`] — login wall served instead of JSON, after
    ///   all retries exhausted.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`ScraperError::Http`] — network or TLS failure after all retries exhausted.
    /// - [`ScraperError::Deserialize`] — response body is not valid JSON or
    ///   does not match the expected shape (not retried).
    pub async fn fetch_media_page(
        &self,
        username: &str,
        count: u32,
        after: Option<&str>,
    ) -> Result<(ProfileMediaResponse, Option<String>), ScraperError> {
        let url = self.media_url(username, count, after);
        let max_retries = self.max_retries;
        let backoff_base_secs = self.backoff_base_secs;

        crate::rate_limit::retry_with_backoff(max_retries, backoff_base_secs, || {
            let url = url.clone();
            let username = username.to_owned();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(ScraperError::RateLimited {
                        username,
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;

                // The upstream serves an HTML login wall with a 200 status
                // when it decides a caller looks automated.
                if looks_like_login_wall(&body) {
                    return Err(ScraperError::Blocked { username });
                }

                let parsed =
                    serde_json::from_str::<ProfileMediaResponse>(&body).map_err(|e| {
                        ScraperError::Deserialize {
                            context: format!("media page for @{username}"),
                            source: e,
                        }
                    })?;

                let cursor = next_cursor(&parsed);
                Ok((parsed, cursor))
            }
        })
        .await
    }

    /// Fetches a profile's recent posts, walking pagination up to
    /// `opts.max_pages` pages ("deep scan") with a fixed sleep between pages.
    ///
    /// Stopping at the configured bound is normal behavior, not an error;
    /// only a cursor that keeps cycling past the absolute [`MAX_PAGES`] guard
    /// produces [`ScraperError::PaginationLimit`].
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_media_page`].
    pub async fn fetch_recent_posts(
        &self,
        username: &str,
        opts: &FetchOptions,
    ) -> Result<Vec<NormalizedPost>, ScraperError> {
        let mut posts: Vec<NormalizedPost> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut is_first_page = true;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ScraperError::PaginationLimit {
                    username: username.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            if !is_first_page && opts.inter_page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(opts.inter_page_delay_ms)).await;
            }
            is_first_page = false;

            let (response, next) = self
                .fetch_media_page(username, opts.page_size, cursor.as_deref())
                .await?;

            for edge in &response.graphql.user.edge_owner_to_timeline_media.edges {
                posts.push(normalize_post(&self.base_url, &edge.node));
            }

            cursor = next;
            if cursor.is_none() || page_count >= opts.max_pages {
                break;
            }
        }

        Ok(posts)
    }

    /// Builds the media URL for the given profile, page size, and optional
    /// cursor.
    ///
    /// The endpoint shape is the profile page with the JSON switch flags;
    /// the cursor rides in the `after` query parameter.
    fn media_url(&self, username: &str, count: u32, after: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}/?__a=1&__d=dis&count={}",
            self.base_url, username, count
        );
        if let Some(cursor) = after {
            // Cursors are base64url-encoded by the upstream; no escaping needed.
            url.push_str("&after=");
            url.push_str(cursor);
        }
        url
    }
}

/// Returns `true` if the body looks like the HTML login wall rather than the
/// JSON payload.
fn looks_like_login_wall(body: &str) -> bool {
    let trimmed = body.trim_start();
    if !trimmed.starts_with('<') {
        return false;
    }
    let lowered = trimmed.to_ascii_lowercase();
    lowered.contains("loginform") || lowered.contains("<html") || lowered.contains("<!doctype")
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
