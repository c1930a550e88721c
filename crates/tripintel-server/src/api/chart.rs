use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use tripintel_feeds::{ChartSeries, DataSource};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ChartQuery {
    pub symbol: Option<String>,
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChartData {
    source: DataSource,
    chart: ChartSeries,
}

pub(super) async fn get_chart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<ChartData>>, ApiError> {
    let symbol = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "validation_error", "symbol is required")
        })?;
    let range = query.range.as_deref().unwrap_or("1mo");

    let feed = state.feeds.chart(symbol, range).await;

    Ok(Json(ApiResponse {
        data: ChartData {
            source: feed.source,
            chart: feed.data,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
