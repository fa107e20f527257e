//! HTTP fetcher shared by every stage of a search
//!
//! Wraps a `reqwest::Client` with the baseline headers and turns response
//! bodies into decoded text. Transport failures are logged and degrade to an
//! empty body so callers never see them as errors.

use std::borrow::Cow;
use std::io::Read;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use flate2::read::GzDecoder;
use reqwest::header::{self, HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::{debug, error};

use crate::error::{ReleasesMoeError, Result};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent sent with every request unless the caller overrides it
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
enum FetchFailure {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("corrupt gzip body: {0}")]
    Gzip(#[from] std::io::Error),
}

/// HTTP client wrapper returning decoded text
///
/// - GET when no body is given, POST otherwise
/// - Baseline headers merged under caller headers
/// - No retries: a failed request yields an empty string
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new fetcher with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            ReleasesMoeError::Config(format!("invalid user agent: {e}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(ReleasesMoeError::HttpError)?;

        Ok(Self { client })
    }

    /// Fetch a URL and return its body as text
    ///
    /// # Arguments
    /// * `url` - Absolute URL
    /// * `headers` - Extra headers, overriding the baseline ones
    /// * `body` - Request body; `Some` turns the request into a POST
    ///
    /// # Returns
    /// The decoded body, or an empty string if the request failed
    pub async fn fetch(&self, url: &str, headers: HeaderMap, body: Option<Vec<u8>>) -> String {
        match self.try_fetch(url, headers, body).await {
            Ok(text) => text,
            Err(e) => {
                error!(url, "Connection error: {e}");
                String::new()
            }
        }
    }

    /// Shorthand for a GET without extra headers
    pub async fn get(&self, url: &str) -> String {
        self.fetch(url, HeaderMap::new(), None).await
    }

    async fn try_fetch(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> std::result::Result<String, FetchFailure> {
        let request = match body {
            Some(body) => self.client.post(url).body(body),
            None => self.client.get(url),
        };

        let response = request.headers(headers).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = response.bytes().await?;
        debug!(url, bytes = bytes.len(), "fetched");

        Ok(decode_body(&bytes, content_type.as_deref())?)
    }
}

/// Turn a raw response body into text
///
/// Gunzips bodies that start with the gzip magic, decodes with the charset
/// from `content_type` (UTF-8 when absent or unknown, lossy either way) and
/// resolves HTML entities.
pub fn decode_body(data: &[u8], content_type: Option<&str>) -> std::io::Result<String> {
    let data: Cow<'_, [u8]> = if data.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(data).read_to_end(&mut inflated)?;
        Cow::Owned(inflated)
    } else {
        Cow::Borrowed(data)
    };

    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(&data);
    Ok(html_escape::decode_html_entities(&text).into_owned())
}

/// Extracts the `charset=` parameter from a Content-Type value
fn charset_label(content_type: &str) -> Option<&str> {
    let (_, rest) = content_type.split_once("charset=")?;
    let label = rest.split(';').next()?.trim().trim_matches('"');
    if label.is_empty() { None } else { Some(label) }
}
