//! HTTP client construction
//!
//! Builds the `reqwest` client shared by every outbound call of the minting
//! client, with the identifying headers the allocation service expects.

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "TangyuanAgent/1.0 (AI Agent)";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User-Agent header value
    pub user_agent: String,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Default whole-request timeout (individual requests may override it)
    pub request_timeout: Duration,
    /// Idle connections kept per host; fan-out bursts reuse them
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 64,
        }
    }
}

/// Error when building the HTTP client
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Build the default header set
///
/// ## Arguments
/// * `user_agent` - Value for the User-Agent header
///
/// ## Returns
/// * `Ok(HeaderMap)` - User-Agent, Content-Type and Accept headers
/// * `Err(HttpClientError)` - The User-Agent contains characters not allowed in headers
pub fn default_headers(user_agent: &str) -> Result<HeaderMap, HttpClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).map_err(|_| HttpClientError::InvalidHeader("User-Agent"))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Build a pooled HTTP client from configuration
pub fn build_client(config: &HttpClientConfig) -> Result<Client, HttpClientError> {
    let client = Client::builder()
        .default_headers(default_headers(&config.user_agent)?)
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .tcp_nodelay(true)
        .build()?;
    Ok(client)
}

/// Open a connection to `url` ahead of time so the TLS handshake is not paid
/// on the first time-critical request. Failures are ignored.
pub async fn warm_up(client: &Client, url: &str) {
    match client.head(url).send().await {
        Ok(response) => {
            tracing::debug!(url, status = response.status().as_u16(), "Connection warmed up");
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "Connection warm-up failed, continuing");
        }
    }
}
