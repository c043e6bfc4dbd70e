//! Minimal HTTP client for the harvester: retries, browser-like headers,
//! JSON and text bodies.
//!
//! - Request options: headers, query params, timeout, retries
//! - Retries network failures, 429 and 5xx with a **fixed** inter-attempt
//!   delay (transcript hosts throttle on bursts, not on volume)
//! - Sends a browser-like `User-Agent` by default; the bare reqwest UA is
//!   rejected by the article host with a 403
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), aircheck_http::HttpError> {
//! let client = aircheck_http::HttpClient::new("https://www.example.com")?;
//! let page: String = client
//!     .get_text("politics/transcript/some-article", aircheck_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! retries and final errors under the `http` target, each carrying a
//! `req_id` (UUID) so one logical fetch can be followed across attempts.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use uuid::Uuid;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// ==============================
// Errors
// ==============================

/// Failure modes surfaced to the pipeline. `Api` and `Network` are the
/// "fetch failed" sentinels the batch loop logs and skips past.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {body_snippet}")]
    Api {
        status: StatusCode,
        body_snippet: String,
    },
}

// ==============================
// Request options
// ==============================

/// Per-request tuning knobs.
///
/// ```
/// use aircheck_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(1),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("q", "term".into())]
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
    pub retry_delay: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL, presenting browser-like
    /// headers on every request.
    ///
    /// ```no_run
    /// use aircheck_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://www.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 3);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        Self::with_user_agent(base, DEFAULT_USER_AGENT)
    }

    /// Same as [`HttpClient::new`] but with a caller-supplied `User-Agent`.
    pub fn with_user_agent(base: &str, user_agent: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| HttpError::Build(e.to_string()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget returned by [`HttpClient::new`].
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Override the fixed delay slept between attempts.
    pub fn with_retry_delay(mut self, dur: Duration) -> Self {
        self.retry_delay = dur;
        self
    }

    /// GET a JSON document (listing API responses).
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let (req_id, bytes) = self.request_bytes(Method::GET, path, opts).await?;
        let snippet = snip_body(&bytes);
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            tracing::warn!(
                target: "http",
                req_id=%req_id,
                serde_err=%e.to_string(),
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// GET a text document (raw article HTML). Invalid UTF-8 is replaced,
    /// never fatal: transcript pages occasionally carry stray bytes.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let (_req_id, bytes) = self.request_bytes(Method::GET, path, opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_bytes(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<(Uuid, Vec<u8>), HttpError> {
        let url = resolve_url(&self.base, path, opts.allow_absolute)?;

        let req_id = Uuid::new_v4();
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let mut attempt = 0usize;

        loop {
            let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);

            if let Some(q) = &opts.query {
                let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
                rb = rb.query(&pairs);
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }

            tracing::debug!(
                target: "http",
                req_id=%req_id,
                attempt=attempt + 1,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
                timeout_ms=timeout.as_millis() as u64,
                "http.request.start"
            );

            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        tracing::warn!(
                            target: "http",
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            delay_ms=self.retry_delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_send"
                        );
                        sleep(self.retry_delay).await;
                        continue;
                    }
                    return Err(HttpError::Network(message));
                }
            };

            let status = resp.status();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        tracing::warn!(
                            target: "http",
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            delay_ms=self.retry_delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network_body"
                        );
                        sleep(self.retry_delay).await;
                        continue;
                    }
                    return Err(HttpError::Network(message));
                }
            };

            tracing::debug!(
                target: "http",
                req_id=%req_id,
                %status,
                duration_ms=t0.elapsed().as_millis() as u64,
                body_len=bytes.len(),
                "http.response"
            );

            if status.is_success() {
                return Ok((req_id, bytes.to_vec()));
            }

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            let snippet = snip_body(&bytes);
            if retryable && attempt < max_retries {
                attempt += 1;
                tracing::warn!(
                    target: "http",
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    delay_ms=self.retry_delay.as_millis() as u64,
                    body_snippet=%snippet,
                    "http.retrying"
                );
                sleep(self.retry_delay).await;
                continue;
            }

            tracing::warn!(
                target: "http",
                req_id=%req_id,
                %status,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                body_snippet: snippet,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn resolve_url(base: &Url, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
    if allow_absolute {
        if let Ok(abs) = Url::parse(path) {
            return Ok(abs);
        }
    }
    base.join(path).map_err(|e| HttpError::Url(e.to_string()))
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        // The cut must land on a char boundary; byte 500 may sit inside a
        // multibyte sequence.
        let mut cut = 500;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_relative_paths() {
        let base = Url::parse("https://www.example.com/api/").unwrap();
        let url = resolve_url(&base, "article-search", false).unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/api/article-search");
    }

    #[test]
    fn resolve_honors_absolute_urls_when_allowed() {
        let base = Url::parse("https://www.example.com/api/").unwrap();
        let url = resolve_url(&base, "https://other.example.com/page", true).unwrap();
        assert_eq!(url.domain(), Some("other.example.com"));
    }

    #[test]
    fn snip_truncates_long_bodies() {
        let body = vec![b'x'; 2_000];
        let snip = snip_body(&body);
        assert_eq!(snip.len(), 503);
        assert!(snip.ends_with("..."));
    }

    #[test]
    fn snip_backs_off_to_a_char_boundary() {
        // 499 ASCII bytes followed by multibyte chars puts byte 500 inside
        // the first multibyte sequence.
        let mut body = vec![b'x'; 499];
        body.extend_from_slice("é…é…".as_bytes());
        let snip = snip_body(&body);
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= 503);

        // Error bodies that are pure multibyte text must not crash either.
        let wide = "…".repeat(400);
        let snip = snip_body(wide.as_bytes());
        assert!(snip.ends_with("..."));
    }
}
