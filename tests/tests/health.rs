//! Health endpoint integration tests.
//!
//! Verifies the health endpoints report component state and that the
//! probes respond without touching the defended routes.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;

/// Test /health returns the component breakdown
#[tokio::test]
async fn test_health_returns_component_structure() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(
        body.get("status").is_some(),
        "Health response should have 'status' field"
    );
    assert!(
        body.get("store_connected").is_some(),
        "Health response should have 'store_connected' field"
    );
    assert!(
        body.get("notifier_healthy").is_some(),
        "Health response should have 'notifier_healthy' field"
    );
    assert!(
        body.get("tracked_windows").is_some(),
        "Health response should have 'tracked_windows' field"
    );
}

/// Test /health status is one of the known values
#[tokio::test]
async fn test_health_status_is_valid_value() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    let body: serde_json::Value = response.json();

    let status = body["status"].as_str().unwrap_or_default();
    assert!(
        ["healthy", "degraded", "unhealthy"].contains(&status),
        "Status should be 'healthy', 'degraded', or 'unhealthy', got: {status}"
    );
    assert!(
        body["tracked_windows"].is_u64(),
        "tracked_windows should be a number"
    );
}

/// Test /health/ready reflects store reachability
#[tokio::test]
async fn test_ready_when_store_is_reachable() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health/ready").await;
    response.assert_status(StatusCode::OK);
}

/// Test /health/live always succeeds while the process runs
#[tokio::test]
async fn test_liveness_always_ok() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health/live").await;
    response.assert_status(StatusCode::OK);
}

/// Test all health endpoints respond
#[tokio::test]
async fn test_all_health_endpoints_respond() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let response = server.get("/health/ready").await;
    assert!(
        response.status_code() == StatusCode::OK
            || response.status_code() == StatusCode::SERVICE_UNAVAILABLE,
        "Readiness should answer definitively, got: {}",
        response.status_code()
    );

    let response = server.get("/health/live").await;
    response.assert_status(StatusCode::OK);
}
