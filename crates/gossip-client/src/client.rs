//! The HTTP client shared by every endpoint group.

use std::sync::RwLock;

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use gossip_core::config::api::ApiConfig;
use gossip_core::error::{AppError, ErrorKind};
use gossip_core::result::AppResult;

use crate::error::{status_error, transport_error};
use crate::retry::{RetryPolicy, is_retryable_status, parse_retry_after};

/// One failed attempt, with the server's `Retry-After` hint if any.
struct Failure {
    error: AppError,
    retry_after: Option<u64>,
}

/// JSON client for the GossipGo backend.
///
/// Holds the bearer token of the signed-in user; a successful login stores
/// it and logout clears it.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build HTTP client",
                    e,
                )
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from(config),
            token: RwLock::new(None),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Use `token` for subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = Some(token.into());
    }

    /// Stop sending a bearer token.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = None;
    }

    /// The current bearer token.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET path`.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        self.execute(Method::GET, path, query, None::<&()>).await
    }

    /// `POST path` with a JSON body.
    pub async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> AppResult<Value> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<B: Serialize + Sync>(&self, path: &str, body: &B) -> AppResult<Value> {
        self.execute(Method::PUT, path, &[], Some(body)).await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str) -> AppResult<Value> {
        self.execute(Method::DELETE, path, &[], None::<&()>).await
    }

    /// Send a request, retrying transient failures per the retry policy.
    pub async fn execute<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> AppResult<Value> {
        let url = self.url(path);
        let mut attempt = 0;

        loop {
            let mut request = self.http.request(method.clone(), &url);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(token) = self.token() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            match self.send_once(&url, request).await {
                Ok(value) => {
                    debug!(method = %method, url = %url, attempt, "Request succeeded");
                    return Ok(value);
                }
                Err(failure) if failure.error.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt, failure.retry_after);
                    warn!(
                        method = %method,
                        url = %url,
                        attempt = attempt + 1,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure.error.message,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn send_once(&self, url: &str, request: RequestBuilder) -> Result<Value, Failure> {
        let response = request.send().await.map_err(|e| Failure {
            error: transport_error(url, e),
            retry_after: None,
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let text = response.text().await.map_err(|e| Failure {
            error: transport_error(url, e),
            retry_after: None,
        })?;

        if !status.is_success() {
            let error = status_error(status.as_u16(), &text);
            if !is_retryable_status(status.as_u16()) {
                debug!(url = %url, status = status.as_u16(), "Request rejected");
            }
            return Err(Failure { error, retry_after });
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Failure {
            error: AppError::from(e),
            retry_after: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let api = client("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/api/users"), "http://localhost:8000/api/users");
        assert_eq!(api.url("api/users"), "http://localhost:8000/api/users");
    }

    #[test]
    fn token_lifecycle() {
        let api = client("http://localhost:8000");
        assert!(api.token().is_none());
        api.set_token("abc");
        assert_eq!(api.token().as_deref(), Some("abc"));
        api.clear_token();
        assert!(api.token().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_service_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{addr}")).with_retry(RetryPolicy::none());
        let err = api.get("/api/users", &[]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
    }
}
