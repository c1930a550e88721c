//! Normalization of raw media nodes into storage-ready posts.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::types::MediaNode;

/// A post scraped from a profile, normalized for persistence.
#[derive(Debug, Clone)]
pub struct NormalizedPost {
    /// Platform media id, stored as a string to avoid precision loss.
    pub platform_post_id: String,
    /// Canonical post URL built from the shortcode.
    pub url: String,
    pub caption: Option<String>,
    /// Static image URL first, then the video URL for video posts.
    pub media_urls: Vec<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub like_count: i32,
    pub comment_count: i32,
    /// SHA-256 hex digest of the caption; `None` for caption-less posts.
    pub caption_fingerprint: Option<String>,
}

/// Converts a raw [`MediaNode`] into a [`NormalizedPost`].
///
/// `post_base_url` is the origin used to build the canonical post URL,
/// e.g. `"https://www.instagram.com"`.
#[must_use]
pub fn normalize_post(post_base_url: &str, node: &MediaNode) -> NormalizedPost {
    let caption = node.caption().map(str::to_owned);
    let caption_fingerprint = caption.as_deref().map(fingerprint);

    let mut media_urls = Vec::new();
    if let Some(display_url) = &node.display_url {
        media_urls.push(display_url.clone());
    }
    if let Some(video_url) = &node.video_url {
        media_urls.push(video_url.clone());
    }

    let posted_at = node
        .taken_at_timestamp
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

    NormalizedPost {
        platform_post_id: node.id.clone(),
        url: format!(
            "{}/p/{}/",
            post_base_url.trim_end_matches('/'),
            node.shortcode
        ),
        caption,
        media_urls,
        posted_at,
        like_count: clamp_count(node.edge_liked_by.count),
        comment_count: clamp_count(node.edge_media_to_comment.count),
        caption_fingerprint,
    }
}

/// SHA-256 hex digest of a caption, used to detect edits across scrapes.
fn fingerprint(caption: &str) -> String {
    let digest = Sha256::digest(caption.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Engagement counts arrive as i64 but are stored as i32; negative values
/// (returned when counts are hidden) collapse to zero.
fn clamp_count(count: i64) -> i32 {
    i32::try_from(count.max(0)).unwrap_or(i32::MAX)
}
