pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod rate_limit;
pub mod types;

pub use client::{FetchOptions, ProfileClient};
pub use error::ScraperError;
pub use normalize::{normalize_post, NormalizedPost};
pub use rate_limit::jitter_delay;
pub use types::{MediaEdge, MediaNode, PageInfo, ProfileMediaResponse};
