//! Response types for the public profile media endpoint.
//!
//! ## Observed shape
//!
//! The profile endpoint is undocumented and the response nests the timeline
//! under `graphql.user.edge_owner_to_timeline_media`. Fields come and go as
//! the upstream evolves, so everything non-essential carries
//! `#[serde(default)]` and parsing is deliberately tolerant:
//!
//! - Captions live in `edge_media_to_caption.edges[0].node.text` and may be
//!   absent entirely (photo dumps with no caption).
//! - `taken_at_timestamp` is unix seconds; observed missing on some reel
//!   nodes, so it is optional.
//! - Engagement counts (`edge_liked_by`, `edge_media_to_comment`) are zero
//!   when the account hides like counts.
//! - `video_url` is present only on video nodes; `display_url` is always a
//!   static image.
//! - `page_info.end_cursor` may be an empty string on the last page even
//!   when `has_next_page` is false.

use serde::Deserialize;

/// Top-level response from the profile media endpoint.
#[derive(Debug, Deserialize)]
pub struct ProfileMediaResponse {
    pub graphql: GraphqlEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlEnvelope {
    pub user: ProfileUser,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUser {
    /// Opaque numeric user id, as a string.
    #[serde(default)]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub edge_owner_to_timeline_media: TimelineMedia,
}

#[derive(Debug, Deserialize)]
pub struct TimelineMedia {
    /// Total post count claimed by the profile header.
    #[serde(default)]
    pub count: i64,
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MediaEdge {
    pub node: MediaNode,
}

/// A single post node from the timeline.
#[derive(Debug, Deserialize)]
pub struct MediaNode {
    /// Platform media id (e.g., `"3179482..."`), distinct from the shortcode.
    pub id: String,
    /// URL slug of the post (e.g., `"CxAbc123"`).
    pub shortcode: String,
    #[serde(default)]
    pub taken_at_timestamp: Option<i64>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub edge_media_to_caption: CaptionEdges,
    #[serde(default)]
    pub edge_liked_by: CountNode,
    #[serde(default)]
    pub edge_media_to_comment: CountNode,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
pub struct CaptionEdge {
    pub node: CaptionNode,
}

#[derive(Debug, Deserialize)]
pub struct CaptionNode {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountNode {
    #[serde(default)]
    pub count: i64,
}

impl MediaNode {
    /// Returns the caption text, if the post has one.
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.edge_media_to_caption
            .edges
            .first()
            .map(|e| e.node.text.as_str())
            .filter(|t| !t.is_empty())
    }
}
