use thiserror::Error;

/// Upstream fetch/parse failures. These never escape the public client
/// methods — they only decide which degradation tier serves the request —
/// but they are logged, so the variants stay descriptive.
#[derive(Debug, Error)]
pub enum FeedsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON parse error in {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("upstream response missing {context}")]
    MissingData { context: &'static str },
}
