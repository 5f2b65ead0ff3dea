//! Liveness and readiness endpoints.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_health_endpoints_return_empty_ok() {
    // Health checks never touch the downstream.
    let backend = common::unreachable_addr().await;
    let (addr, shutdown) = common::start_service(backend, common::anonymous_identity()).await;
    let client = common::client();

    for path in ["/health/ready", "/health/live"] {
        let res = client
            .get(format!("http://{}{}", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{path}");
        assert!(res.text().await.unwrap().is_empty(), "{path}");
    }

    shutdown.trigger();
}
