use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PostsQuery {
    pub account: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct PostItem {
    id: i64,
    platform_post_id: String,
    url: String,
    caption: Option<String>,
    media_urls: serde_json::Value,
    posted_at: Option<DateTime<Utc>>,
    like_count: i32,
    comment_count: i32,
    first_seen_at: DateTime<Utc>,
    last_seen_at: DateTime<Utc>,
}

impl From<tripintel_db::PostRow> for PostItem {
    fn from(row: tripintel_db::PostRow) -> Self {
        Self {
            id: row.id,
            platform_post_id: row.platform_post_id,
            url: row.url,
            caption: row.caption,
            media_urls: row.media_urls,
            posted_at: row.posted_at,
            like_count: row.like_count,
            comment_count: row.comment_count,
            first_seen_at: row.first_seen_at,
            last_seen_at: row.last_seen_at,
        }
    }
}

pub(super) async fn list_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<ApiResponse<Vec<PostItem>>>, ApiError> {
    let limit = normalize_limit(query.limit);

    let rows = match query.account.as_deref() {
        Some(handle) => {
            let account = tripintel_db::get_account_by_handle(&state.pool, handle)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?
                .ok_or_else(|| {
                    ApiError::new(
                        req_id.0.clone(),
                        "not_found",
                        format!("account '{handle}' not found"),
                    )
                })?;
            tripintel_db::list_posts_for_account(&state.pool, account.id, limit)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        }
        None => tripintel_db::list_recent_posts(&state.pool, limit)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?,
    };

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(PostItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::PostItem;
    use chrono::Utc;

    #[test]
    fn post_item_is_serializable() {
        let item = PostItem {
            id: 7,
            platform_post_id: "900001".to_string(),
            url: "https://www.instagram.com/p/CxA/".to_string(),
            caption: Some("5 nights in Dahab".to_string()),
            media_urls: serde_json::json!(["https://cdn.example.com/a.jpg"]),
            posted_at: Some(Utc::now()),
            like_count: 10,
            comment_count: 2,
            first_seen_at: Utc::now(),
            last_seen_at: Utc::now(),
        };
        let json = serde_json::to_string(&item).expect("serialize post");
        assert!(json.contains("\"platform_post_id\":\"900001\""));
        assert!(json.contains("\"like_count\":10"));
    }
}
