//! HTTP transport for health probes

use async_trait::async_trait;
use bytes::Bytes;
use http::header::USER_AGENT;
use http::{Method, StatusCode, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Fixed timeout for a single probe, covering headers and body
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

type BoxError = Box<dyn StdError + Send + Sync>;

/// Raw outcome of one HTTP call, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The call failed below HTTP (connect, DNS, timeout, broken body)
    Transport(String),
    /// The endpoint answered
    Response {
        /// HTTP status code
        status: StatusCode,
        /// Fully drained response body
        body: Bytes,
    },
}

impl ProbeOutcome {
    /// Build a response outcome
    pub fn response(status: StatusCode, body: impl Into<Bytes>) -> Self {
        ProbeOutcome::Response {
            status,
            body: body.into(),
        }
    }

    /// Build a transport failure outcome
    pub fn transport(message: impl Into<String>) -> Self {
        ProbeOutcome::Transport(message.into())
    }
}

/// Trait for performing the HTTP side of a probe
#[async_trait]
pub trait HealthCheck: Send + Sync + fmt::Debug {
    /// GET the endpoint and return what happened
    async fn fetch(&self, endpoint: &str) -> ProbeOutcome;
}

/// HTTP health checker backed by a pooled hyper client
///
/// Speaks both `http` and `https`; server certificates are verified against
/// the bundled webpki roots.
#[derive(Debug, Clone)]
pub struct HttpHealthCheck {
    timeout_duration: Duration,
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl HttpHealthCheck {
    /// Create a new HTTP health checker
    pub fn new(timeout_duration: Duration) -> Self {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new())
            .http1_title_case_headers(true)
            .build(connector);

        Self {
            timeout_duration,
            client,
        }
    }

    /// Timeout applied to each fetch
    pub fn timeout(&self) -> Duration {
        self.timeout_duration
    }

    async fn exchange(&self, uri: Uri) -> Result<(StatusCode, Bytes), BoxError> {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(USER_AGENT, concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .body(Empty::<Bytes>::new())?;

        let response = self.client.request(req).await?;
        let status = response.status();

        // Always drain so the pooled connection is released.
        let body = response.into_body().collect().await?.to_bytes();

        Ok((status, body))
    }
}

impl Default for HttpHealthCheck {
    fn default() -> Self {
        Self::new(PROBE_TIMEOUT)
    }
}

#[async_trait]
impl HealthCheck for HttpHealthCheck {
    async fn fetch(&self, endpoint: &str) -> ProbeOutcome {
        let uri: Uri = match endpoint.parse() {
            Ok(u) => u,
            Err(e) => {
                return ProbeOutcome::transport(format!("invalid endpoint {endpoint:?}: {e}"));
            }
        };

        match timeout(self.timeout_duration, self.exchange(uri)).await {
            Ok(Ok((status, body))) => {
                debug!(%endpoint, %status, body_len = body.len(), "Probe answered");
                ProbeOutcome::Response { status, body }
            }
            Ok(Err(e)) => {
                let message = format!("GET {endpoint}: {}", error_chain(e.as_ref()));
                debug!(%endpoint, error = %message, "Probe transport error");
                ProbeOutcome::Transport(message)
            }
            Err(_) => {
                debug!(%endpoint, "Probe timed out");
                ProbeOutcome::Transport(format!(
                    "GET {endpoint}: request timed out after {:?}",
                    self.timeout_duration
                ))
            }
        }
    }
}

/// Render an error and its sources as `outer: inner: root`
///
/// hyper-util's top-level errors ("client error (Connect)") carry the useful
/// detail only in their sources.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last().map_or(true, |last| !last.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }

    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_reads_status_and_body() {
        let base = serve(Router::new().route("/health", get(|| async { r#"{"status":"ok"}"# }))).await;

        let checker = HttpHealthCheck::default();
        let outcome = checker.fetch(&format!("{base}/health")).await;

        assert_eq!(
            outcome,
            ProbeOutcome::response(StatusCode::OK, Bytes::from_static(br#"{"status":"ok"}"#))
        );
    }

    #[tokio::test]
    async fn test_fetch_non_200() {
        let base = serve(Router::new().route(
            "/health",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        ))
        .await;

        let outcome = HttpHealthCheck::default().fetch(&format!("{base}/health")).await;

        match outcome {
            ProbeOutcome::Response { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, Bytes::from_static(b"down"));
            }
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = HttpHealthCheck::default()
            .fetch(&format!("http://{addr}/health"))
            .await;

        match outcome {
            ProbeOutcome::Transport(message) => {
                assert!(message.starts_with("GET http://"));
                assert!(message.len() > format!("GET http://{addr}/health: ").len());
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_https_attempts_connection() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = HttpHealthCheck::default()
            .fetch(&format!("https://{addr}/health"))
            .await;

        match outcome {
            ProbeOutcome::Transport(message) => {
                assert!(!message.contains("scheme"), "{message}");
                assert!(message.to_lowercase().contains("refused"), "{message}");
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_https_against_plain_server_fails_handshake() {
        let base = serve(Router::new().route("/health", get(|| async { r#"{"status":"ok"}"# }))).await;
        let endpoint = format!("{}/health", base.replacen("http://", "https://", 1));

        let outcome = HttpHealthCheck::default().fetch(&endpoint).await;
        assert!(matches!(outcome, ProbeOutcome::Transport(m) if !m.contains("scheme")));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let base = serve(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "ok"
            }),
        ))
        .await;

        let checker = HttpHealthCheck::new(Duration::from_millis(100));
        let outcome = checker.fetch(&format!("{base}/slow")).await;

        match outcome {
            ProbeOutcome::Transport(message) => {
                assert!(message.contains("timed out after 100ms"), "{message}");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_endpoint() {
        let outcome = HttpHealthCheck::default().fetch("not a uri").await;
        assert!(matches!(outcome, ProbeOutcome::Transport(m) if m.contains("invalid endpoint")));
    }

    #[derive(Debug)]
    struct Wrapped(&'static str, Option<std::io::Error>);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_ref().map(|e| e as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let err = Wrapped(
            "client error (Connect)",
            Some(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused")),
        );
        assert_eq!(error_chain(&err), "client error (Connect): connection refused");
    }

    #[test]
    fn test_error_chain_skips_repeated_text() {
        let err = Wrapped(
            "tcp connect error: connection refused",
            Some(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused")),
        );
        assert_eq!(error_chain(&err), "tcp connect error: connection refused");
    }
}
