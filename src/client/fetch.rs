use crate::resilience::{TimeoutConfig, TimeoutExt};
use crate::{Error, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Per-request options passed through to the HTTP client
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Maximum wait before the call fails with [`Error::Timeout`]
    pub timeout: Duration,
    pub accept: String,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: TimeoutConfig::default().request_timeout,
            accept: "application/json".to_string(),
            headers: Vec::new(),
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn apply(&self, client: &Client, url: &str) -> RequestBuilder {
        let mut request = client.get(url).header(ACCEPT, &self.accept);
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        request
    }
}

/// Issue one GET request raced against `options.timeout`.
///
/// Returns whatever settles first: the response (any status), a transport
/// error, or [`Error::Timeout`]. A request still in flight when the timer
/// fires is dropped.
pub async fn fetch_with_timeout(
    client: &Client,
    url: &str,
    options: &FetchOptions,
) -> Result<Response> {
    debug!("GET {}", url);
    let response = options
        .apply(client, url)
        .send()
        .with_timeout_logged(options.timeout, url)
        .await??;
    Ok(response)
}

/// Like [`fetch_with_timeout`], but the deadline covers the whole exchange:
/// sending, checking for a 2xx status and decoding the JSON body.
pub async fn fetch_json_with_timeout<T>(
    client: &Client,
    url: &str,
    options: &FetchOptions,
) -> Result<T>
where
    T: DeserializeOwned,
{
    debug!("GET {} (json)", url);
    exchange_json(client, url, options)
        .with_timeout_logged(options.timeout, url)
        .await?
}

async fn exchange_json<T>(client: &Client, url: &str, options: &FetchOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = options.apply(client, url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::RemoteService {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice::<T>(&body).map_err(|e| Error::malformed(url, e))
}
