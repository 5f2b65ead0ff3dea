//! Response shaping for forwarded requests.
//!
//! Successful downstream bodies are trimmed and wrapped as
//! `customer => {body}\n`, with the app version and instance ID attached as
//! headers. Every downstream failure maps to 503.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::identity::Identity;

pub const APP_VERSION: HeaderName = HeaderName::from_static("app-version");
pub const HOST_NAME: HeaderName = HeaderName::from_static("host-name");

/// Wrap text in the customer response template.
pub fn format_body(text: &str) -> String {
    format!("customer => {}\n", text)
}

/// 200 response for a successful downstream body.
pub fn success(identity: &Identity, downstream_body: &str) -> Response {
    let mut response = (StatusCode::OK, format_body(downstream_body.trim())).into_response();
    let headers = response.headers_mut();

    for (name, value) in [
        (APP_VERSION, identity.app_version()),
        (HOST_NAME, identity.instance_id().to_string()),
    ] {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => tracing::warn!(header = %name, value = %value, "Dropping invalid header value"),
        }
    }

    response
}

/// 503 response carrying `body` verbatim.
pub fn unavailable(body: String) -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
}
