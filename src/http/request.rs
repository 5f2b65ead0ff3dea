//! Inbound request helpers.
//!
//! # Responsibilities
//! - Name the request ID header shared by middleware and tracing
//! - Enforce the `text/plain` content type on forwarded POST bodies
//! - Read optional header values tolerantly

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

/// Request ID header, generated when absent and echoed on the response.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Raw body of a `text/plain` request.
///
/// Requests with any other content type are rejected with
/// `415 Unsupported Media Type` before the body is read.
#[derive(Debug, Clone)]
pub struct PlainText(pub Bytes);

impl<S> FromRequest<S> for PlainText
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_plain_text(req.headers()) {
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content type must be text/plain",
            )
                .into_response());
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(body))
    }
}

fn is_plain_text(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
}

/// Header value as text, decoding non-UTF-8 bytes lossily.
pub fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
