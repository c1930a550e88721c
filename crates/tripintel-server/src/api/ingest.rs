use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripintel_ingest::{run_ingestion, IngestError, IngestOptions};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Default, Deserialize)]
pub(super) struct IngestRequest {
    pub account: Option<String>,
    pub deep: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct IngestResult {
    ingestion_run_id: Uuid,
    status: String,
    accounts_processed: i32,
    posts_collected: i32,
    offers_detected: i32,
    errors: Vec<String>,
}

/// Runs an ingestion synchronously and reports the summary. A concurrent
/// run maps to 409 so callers can retry later instead of double-scraping.
pub(super) async fn trigger_ingest(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Option<Json<IngestRequest>>,
) -> Result<Json<ApiResponse<IngestResult>>, ApiError> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let opts = IngestOptions {
        account: request.account,
        deep: request.deep.unwrap_or(false),
        trigger_source: "api",
    };

    let summary = run_ingestion(&state.pool, &state.config, &opts)
        .await
        .map_err(|e| map_ingest_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: IngestResult {
            ingestion_run_id: summary.public_id,
            status: summary.status,
            accounts_processed: summary.accounts_processed,
            posts_collected: summary.posts_collected,
            offers_detected: summary.offers_detected,
            errors: summary.errors,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_ingest_error(request_id: String, error: &IngestError) -> ApiError {
    match error {
        IngestError::AlreadyRunning => ApiError::new(
            request_id,
            "conflict",
            "an ingestion run is already in progress",
        ),
        IngestError::AccountNotFound { handle } => ApiError::new(
            request_id,
            "not_found",
            format!("account '{handle}' not found"),
        ),
        IngestError::NoAccounts => ApiError::new(
            request_id,
            "validation_error",
            "no active accounts to ingest",
        ),
        other => {
            tracing::error!(error = %other, "ingestion trigger failed");
            ApiError::new(request_id, "internal_error", other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn already_running_maps_to_conflict() {
        let response =
            map_ingest_error("req-1".to_string(), &IngestError::AlreadyRunning).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unknown_account_maps_to_not_found() {
        let error = IngestError::AccountNotFound {
            handle: "ghost".to_string(),
        };
        let response = map_ingest_error("req-1".to_string(), &error).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
