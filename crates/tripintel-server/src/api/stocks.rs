use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use tripintel_feeds::{DataSource, Quote};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

/// Default watchlist when the caller does not pick symbols. Travel and
/// hospitality names the dashboard tracks out of the box.
const DEFAULT_SYMBOLS: &[&str] = &["BKNG", "ABNB", "EXPE", "MAR"];

#[derive(Debug, Deserialize)]
pub(super) struct StocksQuery {
    pub symbols: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct StocksData {
    source: DataSource,
    quotes: Vec<Quote>,
}

pub(super) async fn get_stocks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<StocksQuery>,
) -> Json<ApiResponse<StocksData>> {
    let symbols = parse_symbols(query.symbols.as_deref());
    let feed = state.feeds.quotes(&symbols).await;

    Json(ApiResponse {
        data: StocksData {
            source: feed.source,
            quotes: feed.data,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

fn parse_symbols(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect();

    if parsed.is_empty() {
        DEFAULT_SYMBOLS.iter().map(|s| (*s).to_string()).collect()
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::parse_symbols;

    #[test]
    fn parse_symbols_splits_and_uppercases() {
        assert_eq!(
            parse_symbols(Some("bkng, abnb ,,MAR")),
            vec!["BKNG", "ABNB", "MAR"]
        );
    }

    #[test]
    fn parse_symbols_falls_back_to_watchlist() {
        assert_eq!(parse_symbols(None), vec!["BKNG", "ABNB", "EXPE", "MAR"]);
        assert_eq!(parse_symbols(Some(" , ")), vec!["BKNG", "ABNB", "EXPE", "MAR"]);
    }
}
