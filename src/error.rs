use thiserror::Error;

/// Maximum number of response-body characters carried into a fetch error.
const BODY_EXCERPT: usize = 200;

/// Failure of a single data source. Every variant is fatal to that source
/// only; the loader logs it and moves on to the siblings.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No recognized document shape matched.
    #[error("unsupported data format")]
    Format,
    /// The server answered with a non-2xx status.
    #[error("{url}: HTTP {status}\n{body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    /// Transport-level failure (DNS, TLS, timeout, ...).
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Build a `Status` error with the response body truncated to an excerpt.
    pub fn status(url: impl Into<String>, status: u16, body: &str) -> Self {
        SourceError::Status {
            url: url.into(),
            status,
            body: body.chars().take(BODY_EXCERPT).collect(),
        }
    }
}
