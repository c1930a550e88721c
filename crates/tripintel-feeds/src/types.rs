//! Payload types served by the feeds client.

use serde::{Deserialize, Serialize};

/// Which degradation tier produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Fresh upstream response.
    Live,
    /// Cached copy, possibly past its TTL.
    Cache,
    /// Static seed data; upstream unavailable and nothing cached.
    Fallback,
}

/// A payload plus the tier that produced it. Consumers surface `source` so
/// clients can tell degraded data from live data.
#[derive(Debug, Clone, Serialize)]
pub struct Feed<T> {
    pub source: DataSource,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Unix timestamp, seconds.
    pub timestamp: i64,
    pub close: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub symbol: String,
    pub range: String,
    pub points: Vec<ChartPoint>,
}
