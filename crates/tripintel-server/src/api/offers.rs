use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct OffersQuery {
    pub account: Option<String>,
    pub min_confidence: Option<f32>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct OfferItem {
    id: i64,
    post_id: i64,
    destination: Option<String>,
    price: Option<Decimal>,
    currency_code: Option<String>,
    duration_nights: Option<i32>,
    hotel: Option<String>,
    contact_phone: Option<String>,
    confidence: f32,
    detected_at: DateTime<Utc>,
}

pub(super) async fn list_offers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<OffersQuery>,
) -> Result<Json<ApiResponse<Vec<OfferItem>>>, ApiError> {
    if let Some(min_confidence) = query.min_confidence {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "min_confidence must be between 0 and 1",
            ));
        }
    }

    let rows = tripintel_db::list_offers(
        &state.pool,
        query.account.as_deref(),
        query.min_confidence,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| OfferItem {
            id: row.id,
            post_id: row.post_id,
            destination: row.destination,
            price: row.price,
            currency_code: row.currency_code,
            duration_nights: row.duration_nights,
            hotel: row.hotel,
            contact_phone: row.contact_phone,
            confidence: row.confidence,
            detected_at: row.detected_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::OfferItem;
    use chrono::Utc;

    #[test]
    fn offer_item_is_serializable() {
        let item = OfferItem {
            id: 1,
            post_id: 7,
            destination: Some("Sharm El Sheikh".to_string()),
            price: Some("12500".parse().unwrap()),
            currency_code: Some("EGP".to_string()),
            duration_nights: Some(5),
            hotel: None,
            contact_phone: None,
            confidence: 0.85,
            detected_at: Utc::now(),
        };
        let json = serde_json::to_string(&item).expect("serialize offer");
        assert!(json.contains("\"destination\":\"Sharm El Sheikh\""));
        assert!(json.contains("\"currency_code\":\"EGP\""));
    }
}
