//! Chart JSON parsing for the upstream chart endpoint.

use serde::Deserialize;

use crate::error::FeedsError;
use crate::types::{ChartPoint, ChartSeries};

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Vec<RawChart>,
}

#[derive(Debug, Deserialize)]
struct RawChart {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

/// Close values align index-wise with `timestamp`; holes (halts, holidays)
/// arrive as nulls.
#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Parses the chart endpoint body into a [`ChartSeries`], dropping points
/// without a close value.
pub(crate) fn parse_chart_response(
    body: &str,
    symbol: &str,
    range: &str,
) -> Result<ChartSeries, FeedsError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|source| FeedsError::Json {
            context: "chart response",
            source,
        })?;

    let raw = envelope
        .chart
        .result
        .into_iter()
        .next()
        .ok_or(FeedsError::MissingData {
            context: "chart result",
        })?;
    let closes = raw
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or(FeedsError::MissingData {
            context: "chart quote series",
        })?;

    let points: Vec<ChartPoint> = raw
        .timestamp
        .iter()
        .zip(closes.close.iter())
        .filter_map(|(&timestamp, close)| close.map(|close| ChartPoint { timestamp, close }))
        .collect();

    if points.is_empty() {
        return Err(FeedsError::MissingData {
            context: "chart points",
        });
    }

    Ok(ChartSeries {
        symbol: symbol.to_string(),
        range: range.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_series_and_skips_null_closes() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1700000000, 1700086400, 1700172800],
            "indicators": {"quote": [{"close": [100.0, null, 102.5]}]}
        }], "error": null}}"#;

        let series = parse_chart_response(body, "BKNG", "1mo").unwrap();
        assert_eq!(series.symbol, "BKNG");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[1].timestamp, 1_700_172_800);
        assert!((series.points[1].close - 102.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_result_is_missing_data() {
        let body = r#"{"chart": {"result": []}}"#;
        let result = parse_chart_response(body, "BKNG", "1mo");
        assert!(matches!(result, Err(FeedsError::MissingData { .. })));
    }

    #[test]
    fn all_null_closes_is_missing_data() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1700000000],
            "indicators": {"quote": [{"close": [null]}]}
        }]}}"#;
        let result = parse_chart_response(body, "BKNG", "1mo");
        assert!(matches!(result, Err(FeedsError::MissingData { .. })));
    }
}
