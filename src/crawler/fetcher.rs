//! HTTP transport implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The [`Transport`] seam the rest of the crawler fetches through
//! - Building HTTP clients with proper user agent strings and timeouts
//! - Decoding response bodies according to their declared charset
//! - Error classification (network failure, timeout, non-2xx status)

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirects followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// How many leading bytes of a body are searched for a `<meta>` charset
const META_SNIFF_LIMIT: usize = 1024;

/// Why a page could not be fetched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, DNS failure, TLS error, broken body...
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// The request did not complete within the configured timeout
    #[error("request timeout for {url}")]
    Timeout { url: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } | Self::Timeout { url } | Self::Status { url, .. } => url,
        }
    }
}

/// Fetch-by-URL seam used by the page extractor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a page and returns its body decoded to text
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// Formats the user agent string: `Name/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Timeouts and other crawler settings
///
/// # Example
///
/// ```no_run
/// use site_binder::config::{CrawlerConfig, UserAgentConfig};
/// use site_binder::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport from configuration
    pub fn new(user_agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::from_client(build_http_client(user_agent, crawler)?))
    }

    /// Wraps an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        tracing::debug!("Successfully fetched {} ({} bytes)", url, body.len());
        Ok(decode_body(&body, content_type.as_deref()))
    }
}

/// Decodes an HTML body to text
///
/// The charset comes from the `Content-Type` header if it names one, otherwise
/// from a `charset=` declaration near the top of the document, otherwise UTF-8.
/// A byte order mark overrides both.
///
/// # Example
///
/// ```
/// use site_binder::crawler::decode_body;
///
/// let body = b"<p>caf\xE9</p>";
/// assert_eq!(decode_body(body, Some("text/html; charset=ISO-8859-1")), "<p>caf\u{e9}</p>");
/// ```
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(body))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!("Body is not valid {}, malformed bytes replaced", used.name());
    }
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches(|c| c == '"' || c == '\'');
        Encoding::for_label(label.as_bytes())
    })
}

/// Looks for `charset=` in the document head, as in `<meta charset="...">` or
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`
fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(pos) = rest.find("charset=") {
        rest = &rest[pos + "charset=".len()..];
        let label: String = rest
            .trim_start_matches(|c| c == '"' || c == '\'')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
            .collect();
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return Some(encoding);
        }
    }
    None
}

/// Maps a reqwest error onto the transport error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory transport serving fixed pages and recording every request
    #[derive(Debug, Default)]
    pub struct StaticTransport {
        pages: HashMap<String, Result<String, u16>>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serves `html` for `url`
        pub fn page(mut self, url: &str, html: &str) -> Self {
            self.pages
                .insert(url.to_string(), Ok(html.to_string()));
            self
        }

        /// Answers `url` with a non-2xx status
        pub fn status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), Err(status));
            self
        }

        /// URLs requested so far, in request order
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
                None => Err(FetchError::Network {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }
}
