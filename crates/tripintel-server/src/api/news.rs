use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use tripintel_feeds::{DataSource, NewsItem};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

const DEFAULT_QUERY: &str = "travel";

#[derive(Debug, Deserialize)]
pub(super) struct NewsQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct NewsData {
    source: DataSource,
    items: Vec<NewsItem>,
}

pub(super) async fn get_news(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NewsQuery>,
) -> Json<ApiResponse<NewsData>> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUERY);
    let feed = state.feeds.news(q).await;

    Json(ApiResponse {
        data: NewsData {
            source: feed.source,
            items: feed.data,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
