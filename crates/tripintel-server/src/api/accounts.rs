use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct AccountItem {
    handle: String,
    display_name: String,
    platform: String,
    active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<tripintel_db::AccountRow> for AccountItem {
    fn from(row: tripintel_db::AccountRow) -> Self {
        Self {
            handle: row.handle,
            display_name: row.display_name,
            platform: row.platform,
            active: row.is_active,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_accounts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<AccountItem>>>, ApiError> {
    let rows = tripintel_db::list_accounts(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(AccountItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_account(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<AccountItem>>, ApiError> {
    let account = tripintel_db::get_account_by_handle(&state.pool, &handle)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("account '{handle}' not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: AccountItem::from(account),
        meta: ResponseMeta::new(req_id.0),
    }))
}
