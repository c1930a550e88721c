use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct IngestionRunsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct IngestionRunItem {
    id: i64,
    ingestion_run_id: Uuid,
    run_type: String,
    trigger_source: String,
    status: String,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    accounts_processed: i32,
    posts_collected: i32,
    offers_detected: i32,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct IngestionRunAccountItem {
    account_id: i64,
    status: String,
    posts_collected: i32,
    offers_detected: i32,
    error_message: Option<String>,
}

pub(super) async fn list_ingestion_runs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<IngestionRunsQuery>,
) -> Result<Json<ApiResponse<Vec<IngestionRunItem>>>, ApiError> {
    let rows = tripintel_db::list_ingestion_runs(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| IngestionRunItem {
            id: row.id,
            ingestion_run_id: row.public_id,
            run_type: row.run_type,
            trigger_source: row.trigger_source,
            status: row.status,
            started_at: row.started_at,
            completed_at: row.completed_at,
            accounts_processed: row.accounts_processed,
            posts_collected: row.posts_collected,
            offers_detected: row.offers_detected,
            error_message: row.error_message,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_run_accounts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(run_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<IngestionRunAccountItem>>>, ApiError> {
    // Surface 404 for unknown runs instead of an empty list.
    tripintel_db::get_ingestion_run(&state.pool, run_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let rows = tripintel_db::list_ingestion_run_accounts(&state.pool, run_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| IngestionRunAccountItem {
            account_id: row.account_id,
            status: row.status,
            posts_collected: row.posts_collected,
            offers_detected: row.offers_detected,
            error_message: row.error_message,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::IngestionRunItem;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn ingestion_run_item_is_serializable() {
        let item = IngestionRunItem {
            id: 3,
            ingestion_run_id: Uuid::new_v4(),
            run_type: "recent".to_string(),
            trigger_source: "scheduler".to_string(),
            status: "succeeded".to_string(),
            started_at: Some(Utc::now()),
            completed_at: Some(Utc::now()),
            accounts_processed: 4,
            posts_collected: 48,
            offers_detected: 9,
            error_message: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&item).expect("serialize ingestion run");
        assert!(json.contains("\"run_type\":\"recent\""));
        assert!(json.contains("\"offers_detected\":9"));
    }
}
