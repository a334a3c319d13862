//! Fetch collaborator for the upstream data exports.
//!
//! Guarantees to the core: UTF-8 text with any leading byte-order mark
//! stripped before parse, and rejection of non-2xx responses with a
//! truncated copy of the body in the error. Each source is fetched
//! independently; there is no retry policy here.
//!
//! Typical usage:
//! ```no_run
//! # use firemap_rs::fetch::Client;
//! let client = Client::default();
//! let doc = client.fetch_json("https://example.org/data/Existing_Service_Areas.json")?;
//! # Ok::<(), firemap_rs::SourceError>(())
//! ```

use crate::error::SourceError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Synchronous client over the export host.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("firemap_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self { http }
    }
}

// Allow -, _, . unescaped in source file names.
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Percent-encode one path segment of a source file name.
pub fn encode_segment(name: &str) -> String {
    percent_encoding::utf8_percent_encode(name.trim(), SAFE).to_string()
}

impl Client {
    /// GET a JSON document. A cache-busting `cb` parameter is stamped onto
    /// the URL because the export host serves with long-lived cache headers.
    pub fn fetch_json(&self, url: &str) -> Result<Value, SourceError> {
        let sep = if url.contains('?') { '&' } else { '?' };
        let busted = format!("{url}{sep}cb={}", chrono::Utc::now().timestamp_millis());
        let resp = self
            .http
            .get(&busted)
            .send()
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        let text = resp.text().map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(SourceError::status(url, status.as_u16(), &text));
        }
        parse_document(&text)
    }
}

/// Strip an optional UTF-8 byte-order mark, then parse. Shared by the HTTP
/// and local-file paths so both honor the same contract.
pub fn parse_document(text: &str) -> Result<Value, SourceError> {
    let clean = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(serde_json::from_str(clean)?)
}

/// Read and parse a local export file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Value, SourceError> {
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}
