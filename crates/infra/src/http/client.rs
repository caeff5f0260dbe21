//! Retrying HTTP client for the Toggl API

use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use toggldeck_domain::DeckError;
use tracing::debug;

use crate::errors::InfraError;

/// When a failed attempt is worth sending again, and how long to wait.
#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    /// Server errors, except for POST: a start request that reached the
    /// API may already have created the entry.
    fn retries_status(method: &Method, status: StatusCode) -> bool {
        status.is_server_error() && *method != Method::POST
    }

    fn retries_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    /// Wait before retry number `retry` (1-based): the base delay, doubled
    /// per retry, capped at 256x.
    fn delay(&self, retry: usize) -> Duration {
        let doublings = u32::try_from(retry.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_backoff.saturating_mul(1u32 << doublings)
    }
}

/// reqwest client that resends idempotent Toggl calls after transient
/// failures.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Builder with default timeout and retry policy.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Start a request; send it with [`HttpClient::send`].
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying per the client's policy.
    ///
    /// Any HTTP status is returned as a response; only transport failures
    /// after the last attempt become errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, DeckError> {
        let mut retry = 0;
        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| DeckError::Internal("streaming request bodies cannot be resent".into()))?
                .build()
                .map_err(|err| DeckError::from(InfraError::from(err)))?;
            let method = request.method().clone();
            let url = request.url().clone();

            let outcome = self.client.execute(request).await;
            let retryable = match &outcome {
                Ok(response) => RetryPolicy::retries_status(&method, response.status()),
                Err(err) => RetryPolicy::retries_error(err),
            };

            if retryable && retry + 1 < self.retry.attempts {
                retry += 1;
                let delay = self.retry.delay(retry);
                debug!(%method, %url, retry, delay_ms = delay.as_millis(), "Transient failure; retrying");
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                continue;
            }

            return outcome.map_err(|err| InfraError::from(err).into());
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryPolicy { attempts: 3, base_backoff: Duration::from_millis(200) },
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts per request, the first one included. At least one.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles after each.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    /// `User-Agent` header for every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, DeckError> {
        let mut inner = ReqwestClient::builder().timeout(self.timeout);
        if let Some(agent) = self.user_agent {
            inner = inner.user_agent(agent);
        }
        let client = inner.build().map_err(|err| DeckError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, retry: self.retry })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn toggl_http() -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(3)
            .build()
            .unwrap()
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy { attempts: 5, base_backoff: Duration::from_millis(100) };
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(400));
        assert_eq!(policy.delay(20), Duration::from_millis(25_600));
    }

    #[test]
    fn only_repeatable_server_failures_are_retried() {
        assert!(RetryPolicy::retries_status(&Method::GET, StatusCode::BAD_GATEWAY));
        assert!(RetryPolicy::retries_status(&Method::PATCH, StatusCode::SERVICE_UNAVAILABLE));
        assert!(!RetryPolicy::retries_status(&Method::POST, StatusCode::SERVICE_UNAVAILABLE));
        assert!(!RetryPolicy::retries_status(&Method::GET, StatusCode::TOO_MANY_REQUESTS));
    }

    #[tokio::test]
    async fn current_entry_poll_survives_a_flaky_gateway() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        Mock::given(method("GET"))
            .and(path("/me/time_entries/current"))
            .respond_with(move |_: &wiremock::Request| -> ResponseTemplate {
                if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(502)
                } else {
                    ResponseTemplate::new(200).set_body_string("null")
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let http = toggl_http();
        let url = format!("{}/me/time_entries/current", server.uri());
        let response = http.send(http.request(Method::GET, url)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn start_request_is_sent_once_despite_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/5/time_entries"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let http = toggl_http();
        let url = format!("{}/workspaces/5/time_entries", server.uri());
        let response = http.send(http.request(Method::POST, url).body("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn rejected_token_is_returned_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let http = toggl_http();
        let response = http.send(http.request(Method::GET, server.uri())).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unreachable_api_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let http = HttpClient::builder()
            .base_backoff(Duration::from_millis(1))
            .max_attempts(2)
            .build()
            .unwrap();
        let err = http.send(http.request(Method::GET, format!("http://{addr}"))).await.unwrap_err();

        assert!(matches!(err, DeckError::Network(_)), "unexpected error {err:?}");
    }
}
