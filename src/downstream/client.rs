//! Outbound HTTP client for the preference service.
//!
//! One request is sent per call. There are no retries and no fallback; a
//! failure is returned to the caller as soon as it is observed.

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::uri::InvalidUri;
use axum::http::{header, Method, Request, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::DownstreamConfig;
use crate::downstream::error::DownstreamError;
use crate::observability::TraceContext;

/// Result of a single downstream exchange.
pub type DownstreamResult = Result<String, DownstreamError>;

/// Client bound to the configured downstream URL.
#[derive(Clone)]
pub struct DownstreamClient {
    client: Client<HttpConnector, Body>,
    uri: Uri,
    request_timeout: Option<Duration>,
}

impl DownstreamClient {
    /// Create a client for `config.url`.
    pub fn new(config: &DownstreamConfig) -> Result<Self, InvalidUri> {
        let uri: Uri = config.url.parse()?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(config.connect_timeout_ms.map(Duration::from_millis));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            uri,
            request_timeout: config.request_timeout_ms.map(Duration::from_millis),
        })
    }

    /// GET the downstream URL.
    pub async fn get(&self, trace: &TraceContext) -> DownstreamResult {
        self.send(Method::GET, None, trace).await
    }

    /// POST a plain-text body to the downstream URL.
    pub async fn post(&self, body: Bytes, trace: &TraceContext) -> DownstreamResult {
        self.send(Method::POST, Some(body), trace).await
    }

    async fn send(
        &self,
        method: Method,
        body: Option<Bytes>,
        trace: &TraceContext,
    ) -> DownstreamResult {
        let exchange = self.exchange(method.clone(), body, trace);
        match self.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(result) => result,
                Err(_) => Err(self.transport_error(
                    &method,
                    format!("request timed out after {}ms", limit.as_millis()),
                )),
            },
            None => exchange.await,
        }
    }

    async fn exchange(
        &self,
        method: Method,
        body: Option<Bytes>,
        trace: &TraceContext,
    ) -> DownstreamResult {
        let mut builder = Request::builder().method(method.clone()).uri(self.uri.clone());
        let body = match body {
            Some(bytes) => {
                builder = builder.header(header::CONTENT_TYPE, "text/plain");
                Body::from(bytes)
            }
            None => Body::empty(),
        };
        let mut request = builder
            .body(body)
            .map_err(|e| self.transport_error(&method, describe(&e)))?;
        trace.inject(request.headers_mut());

        tracing::debug!(method = %method, uri = %self.uri, "Forwarding to downstream");

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| self.transport_error(&method, describe(&e)))?;

        let status = response.status();
        let bytes = axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
            .await
            .map_err(|e| self.transport_error(&method, describe(&e)))?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        tracing::debug!(status = %status, bytes = bytes.len(), "Downstream responded");

        if status.is_success() {
            Ok(text)
        } else {
            Err(DownstreamError::Http { status, body: text })
        }
    }

    fn transport_error(&self, method: &Method, cause: String) -> DownstreamError {
        DownstreamError::Transport {
            message: format!("I/O error on {} request for \"{}\": {}", method, self.uri, cause),
        }
    }
}

/// Render an error with its whole source chain, outermost first.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_deref().map(|e| e as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_describe_walks_source_chain() {
        let err = Layer(
            "client error (Connect)",
            Some(Box::new(Layer(
                "tcp connect error",
                Some(Box::new(Layer("Connection refused (os error 111)", None))),
            ))),
        );
        assert_eq!(
            describe(&err),
            "client error (Connect): tcp connect error: Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_rejects_unparseable_uri() {
        let config = DownstreamConfig {
            url: "http://bad host".into(),
            ..DownstreamConfig::default()
        };
        assert!(DownstreamClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_downstream_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = DownstreamConfig {
            url: format!("http://{}", addr),
            ..DownstreamConfig::default()
        };
        let client = DownstreamClient::new(&config).unwrap();

        let trace = TraceContext::from_headers(&axum::http::HeaderMap::new(), "test");
        match client.get(&trace).await {
            Err(DownstreamError::Transport { message }) => {
                assert!(message.starts_with("I/O error on GET request for"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
