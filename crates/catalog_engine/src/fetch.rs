use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_warn};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use reqwest::StatusCode;
use serde_json::Value;

use crate::retry::{retry_after, RetryCause, RetryPolicy};
use crate::{FailureKind, FetchError};

/// Characters of a failed response body kept for the log line.
const SNIPPET_CHARS: usize = 140;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/123 Safari/537.36";
const ACCEPT: &str = "application/json, text/plain, */*";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_bytes: u64,
    pub retry: RetryPolicy,
    /// Sent with every request.
    pub headers: Vec<(String, String)>,
    /// Session cookies, sent as a single `Cookie` header.
    pub cookies: Vec<(String, String)>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::for_site(crate::DEFAULT_BASE_URL)
    }
}

impl FetchSettings {
    /// Default settings with `Referer`/`Origin` pointing at `origin`.
    pub fn for_site(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            max_bytes: 16 * 1024 * 1024,
            retry: RetryPolicy::default(),
            headers: vec![
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                ("Accept".to_string(), ACCEPT.to_string()),
                ("Referer".to_string(), format!("{origin}/values")),
                ("Origin".to_string(), origin.to_string()),
            ],
            cookies: Vec::new(),
        }
    }

    /// Sets or replaces one session cookie.
    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    fn header_map(&self) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| FetchError::new(FailureKind::InvalidSettings, err.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| FetchError::new(FailureKind::InvalidSettings, err.to_string()))?;
            headers.insert(name, value);
        }
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            let mut value = HeaderValue::from_str(&cookie)
                .map_err(|err| FetchError::new(FailureKind::InvalidSettings, err.to_string()))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }
        Ok(headers)
    }
}

/// Source of parsed JSON documents.
///
/// Failures are logged by the implementation and surface as `None`; callers
/// treat them as "no data for this request".
#[async_trait::async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Option<Value>;
}

/// HTTP session backed by one `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestJsonClient {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestJsonClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .default_headers(settings.header_map()?)
            .build()
            .map_err(|err| FetchError::new(FailureKind::InvalidSettings, err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// GETs `url` with `query` appended and parses the body as JSON.
    ///
    /// Only a 200 response is accepted. Retryable statuses and transport
    /// failures are retried per the configured policy first.
    pub async fn fetch_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = build_url(url, query)?;
        let response = self.send_with_retry(&url).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = self.read_body(response).await.unwrap_or_default();
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                snippet(&body),
            ));
        }

        let body = self.read_body(response).await?;
        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::InvalidJson, err.to_string()))
    }

    async fn send_with_retry(&self, url: &reqwest::Url) -> Result<reqwest::Response, FetchError> {
        let policy = &self.settings.retry;
        let mut budget = policy.budget();
        loop {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !policy.retries_status(status) {
                        return Ok(response);
                    }
                    let wait = retry_after(status, response.headers());
                    match budget.next_delay(RetryCause::Status, wait) {
                        Some(delay) => {
                            catalog_debug!("{} -> {}; retrying in {:?}", url, status, delay);
                            tokio::time::sleep(delay).await;
                        }
                        // Out of retries: the final response is handled like any other.
                        None => return Ok(response),
                    }
                }
                Err(err) => {
                    if err.is_builder() {
                        return Err(FetchError::new(FailureKind::InvalidUrl, err.to_string()));
                    }
                    let error = map_reqwest_error(err);
                    let cause = if error.kind == FailureKind::Connect {
                        RetryCause::Connect
                    } else {
                        RetryCause::Read
                    };
                    match budget.next_delay(cause, None) {
                        Some(delay) => {
                            catalog_debug!("{} failed ({}); retrying in {:?}", url, error, delay);
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(error),
                    }
                }
            }
        }
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl JsonSource for ReqwestJsonClient {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Option<Value> {
        match self.fetch_json(url, query).await {
            Ok(value) => Some(value),
            Err(err) => {
                match &err.kind {
                    FailureKind::HttpStatus(code) => {
                        catalog_warn!("{} -> {} {}", url, code, err.message)
                    }
                    FailureKind::Timeout => catalog_warn!("read timeout: {}", url),
                    FailureKind::InvalidJson => {
                        catalog_warn!("JSON parse failed for {}: {}", url, err.message)
                    }
                    _ => catalog_warn!("request error: {} {}", url, err),
                }
                None
            }
        }
    }
}

fn build_url(url: &str, query: &[(&str, String)]) -> Result<reqwest::Url, FetchError> {
    let mut parsed = reqwest::Url::parse(url)
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !query.is_empty() {
        parsed
            .query_pairs_mut()
            .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
    }
    Ok(parsed)
}

/// First characters of a body, on one line.
fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(SNIPPET_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_connect() {
        return FetchError::new(FailureKind::Connect, err.to_string());
    }
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
