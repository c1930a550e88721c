//! Market-data feeds: quotes, news headlines, and price charts.
//!
//! Every public method degrades rather than fails: a live upstream response
//! is preferred, a cached payload (fresh or stale) comes second, and static
//! seed data is the floor. The serving tier travels with the payload so
//! consumers can label degraded data.

mod cache;
mod chart;
mod client;
mod error;
mod fallback;
mod news;
mod quotes;
mod types;

pub use client::FeedsClient;
pub use error::FeedsError;
pub use types::{ChartPoint, ChartSeries, DataSource, Feed, NewsItem, Quote};
