//! HTTP client with three-tier degradation: live → cached → static seed.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::cache::TtlCache;
use crate::error::FeedsError;
use crate::types::{ChartSeries, DataSource, Feed, NewsItem, Quote};
use crate::{chart, fallback, news, quotes};

const DEFAULT_QUOTE_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_NEWS_BASE_URL: &str = "https://feeds.finance.yahoo.com";

const MAX_NEWS_ITEMS: usize = 25;

/// Market-data client. All public methods are infallible: an upstream
/// failure downgrades the response tier instead of surfacing an error, so
/// the HTTP endpoints built on top can always answer 200.
pub struct FeedsClient {
    http: reqwest::Client,
    quote_base_url: String,
    news_base_url: String,
    quotes_cache: TtlCache<Vec<Quote>>,
    news_cache: TtlCache<Vec<NewsItem>>,
    chart_cache: TtlCache<ChartSeries>,
}

impl FeedsClient {
    /// # Errors
    ///
    /// Returns [`FeedsError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        request_timeout_secs: u64,
        user_agent: &str,
        cache_ttl: Duration,
    ) -> Result<Self, FeedsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            quote_base_url: DEFAULT_QUOTE_BASE_URL.to_string(),
            news_base_url: DEFAULT_NEWS_BASE_URL.to_string(),
            quotes_cache: TtlCache::new(cache_ttl),
            news_cache: TtlCache::new(cache_ttl),
            chart_cache: TtlCache::new(cache_ttl),
        })
    }

    /// Points both upstreams at a different origin. Used by tests.
    #[must_use]
    pub fn with_base_urls(mut self, quote_base_url: &str, news_base_url: &str) -> Self {
        self.quote_base_url = quote_base_url.trim_end_matches('/').to_string();
        self.news_base_url = news_base_url.trim_end_matches('/').to_string();
        self
    }

    /// Current quotes for the given symbols.
    pub async fn quotes(&self, symbols: &[String]) -> Feed<Vec<Quote>> {
        let normalized: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        let key = normalized.join(",");

        if let Some(cached) = self.quotes_cache.get_fresh(&key).await {
            return Feed {
                source: DataSource::Cache,
                data: cached,
            };
        }

        match self.fetch_quotes(&key).await {
            Ok(data) if !data.is_empty() => {
                self.quotes_cache.put(&key, data.clone()).await;
                Feed {
                    source: DataSource::Live,
                    data,
                }
            }
            Ok(_) => {
                tracing::warn!(symbols = %key, "quote upstream returned no symbols");
                self.degraded_quotes(&key, &normalized).await
            }
            Err(e) => {
                tracing::warn!(symbols = %key, error = %e, "quote upstream failed");
                self.degraded_quotes(&key, &normalized).await
            }
        }
    }

    /// News headlines matching `query`.
    pub async fn news(&self, query: &str) -> Feed<Vec<NewsItem>> {
        let query = query.trim();
        let key = query.to_lowercase();

        if let Some(cached) = self.news_cache.get_fresh(&key).await {
            return Feed {
                source: DataSource::Cache,
                data: cached,
            };
        }

        match self.fetch_news(query).await {
            Ok(data) if !data.is_empty() => {
                self.news_cache.put(&key, data.clone()).await;
                Feed {
                    source: DataSource::Live,
                    data,
                }
            }
            Ok(_) => {
                tracing::warn!(query, "news upstream returned no items");
                self.degraded_news(&key).await
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "news upstream failed");
                self.degraded_news(&key).await
            }
        }
    }

    /// Historical close series for one symbol over `range`.
    pub async fn chart(&self, symbol: &str, range: &str) -> Feed<ChartSeries> {
        let symbol = symbol.trim().to_uppercase();
        let (range, interval, fallback_points) = normalize_range(range);
        let key = format!("{symbol}:{range}");

        if let Some(cached) = self.chart_cache.get_fresh(&key).await {
            return Feed {
                source: DataSource::Cache,
                data: cached,
            };
        }

        match self.fetch_chart(&symbol, range, interval).await {
            Ok(data) => {
                self.chart_cache.put(&key, data.clone()).await;
                Feed {
                    source: DataSource::Live,
                    data,
                }
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, range, error = %e, "chart upstream failed");
                if let Some(stale) = self.chart_cache.get_any(&key).await {
                    return Feed {
                        source: DataSource::Cache,
                        data: stale,
                    };
                }
                Feed {
                    source: DataSource::Fallback,
                    data: fallback::simulated_chart(&symbol, range, fallback_points),
                }
            }
        }
    }

    async fn degraded_quotes(&self, key: &str, symbols: &[String]) -> Feed<Vec<Quote>> {
        if let Some(stale) = self.quotes_cache.get_any(key).await {
            return Feed {
                source: DataSource::Cache,
                data: stale,
            };
        }
        Feed {
            source: DataSource::Fallback,
            data: fallback::fallback_quotes(symbols),
        }
    }

    async fn degraded_news(&self, key: &str) -> Feed<Vec<NewsItem>> {
        if let Some(stale) = self.news_cache.get_any(key).await {
            return Feed {
                source: DataSource::Cache,
                data: stale,
            };
        }
        Feed {
            source: DataSource::Fallback,
            data: fallback::fallback_news(),
        }
    }

    async fn fetch_quotes(&self, joined_symbols: &str) -> Result<Vec<Quote>, FeedsError> {
        let url = format!(
            "{}/v7/finance/quote?symbols={joined_symbols}",
            self.quote_base_url
        );
        let body = self.get_text(&url).await?;
        quotes::parse_quote_response(&body)
    }

    async fn fetch_news(&self, query: &str) -> Result<Vec<NewsItem>, FeedsError> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/rss/2.0/headline?s={encoded}&region=US&lang=en-US",
            self.news_base_url
        );
        let body = self.get_text(&url).await?;
        news::parse_news_rss(&body, MAX_NEWS_ITEMS)
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<ChartSeries, FeedsError> {
        let url = format!(
            "{}/v8/finance/chart/{symbol}?range={range}&interval={interval}",
            self.quote_base_url
        );
        let body = self.get_text(&url).await?;
        chart::parse_chart_response(&body, symbol, range)
    }

    async fn get_text(&self, url: &str) -> Result<String, FeedsError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Maps a requested range onto `(range, interval, fallback point count)`.
/// Unknown ranges degrade to one month of daily points.
fn normalize_range(range: &str) -> (&'static str, &'static str, usize) {
    match range.trim() {
        "1d" => ("1d", "5m", 78),
        "5d" => ("5d", "30m", 65),
        "3mo" => ("3mo", "1d", 66),
        "6mo" => ("6mo", "1d", 130),
        "1y" => ("1y", "1wk", 52),
        _ => ("1mo", "1d", 22),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_range_degrades_to_one_month() {
        assert_eq!(normalize_range("bogus"), ("1mo", "1d", 22));
        assert_eq!(normalize_range("1y"), ("1y", "1wk", 52));
    }
}
