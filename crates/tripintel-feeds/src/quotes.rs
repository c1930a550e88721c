//! Quote JSON parsing for the upstream finance quote endpoint.

use serde::Deserialize;

use crate::error::FeedsError;
use crate::types::Quote;

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(default)]
    result: Vec<RawQuote>,
}

/// Upstream quote object; only the fields we serve. Prices can be absent on
/// halted or delisted symbols, so everything numeric is optional here.
#[derive(Debug, Deserialize)]
struct RawQuote {
    symbol: String,
    #[serde(rename = "regularMarketPrice")]
    price: Option<f64>,
    #[serde(rename = "regularMarketChange")]
    change: Option<f64>,
    #[serde(rename = "regularMarketChangePercent")]
    change_percent: Option<f64>,
    currency: Option<String>,
}

/// Parses the quote endpoint body, dropping symbols without a market price.
pub(crate) fn parse_quote_response(body: &str) -> Result<Vec<Quote>, FeedsError> {
    let envelope: QuoteEnvelope =
        serde_json::from_str(body).map_err(|source| FeedsError::Json {
            context: "quote response",
            source,
        })?;

    let quotes = envelope
        .quote_response
        .result
        .into_iter()
        .filter_map(|raw| {
            let price = raw.price?;
            Some(Quote {
                symbol: raw.symbol,
                price,
                change: raw.change.unwrap_or(0.0),
                change_percent: raw.change_percent.unwrap_or(0.0),
                currency: raw.currency.unwrap_or_else(|| "USD".to_string()),
            })
        })
        .collect();

    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_and_drops_priceless_symbols() {
        let body = r#"{
            "quoteResponse": {
                "result": [
                    {"symbol": "BKNG", "regularMarketPrice": 3500.5,
                     "regularMarketChange": -12.25, "regularMarketChangePercent": -0.35,
                     "currency": "USD"},
                    {"symbol": "HALTED", "currency": "USD"}
                ],
                "error": null
            }
        }"#;

        let quotes = parse_quote_response(body).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "BKNG");
        assert!((quotes[0].price - 3500.5).abs() < f64::EPSILON);
        assert!((quotes[0].change_percent - (-0.35)).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_optional_fields_default() {
        let body = r#"{"quoteResponse": {"result": [
            {"symbol": "ABNB", "regularMarketPrice": 120.0}
        ]}}"#;
        let quotes = parse_quote_response(body).unwrap();
        assert_eq!(quotes[0].currency, "USD");
        assert!(quotes[0].change.abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        let result = parse_quote_response("<html>nope</html>");
        assert!(matches!(result, Err(FeedsError::Json { .. })));
    }
}
