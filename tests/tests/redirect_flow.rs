//! Affiliate redirect integration tests.
//!
//! Drives `GET /out/{slug}` through the real router: UTM merge,
//! attribution cookie issuance, click capture, and the failure paths
//! that must still send the visitor to the partner page.

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

/// Test that explicit UTM values merge with defaults into the partner URL
#[tokio::test]
async fn test_redirect_merges_explicit_utm_with_defaults() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/out/blue-eye-spring-tour?utm_source=newsletter")
        .await;

    response.assert_status(StatusCode::FOUND);
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("302 must carry a Location header");
    assert_eq!(
        location.to_str().unwrap(),
        "https://partner.example/book?id=42&utm_source=newsletter&utm_medium=affiliate&utm_campaign=tour-redirect&utm_content=blue-eye-spring-tour"
    );

    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .expect("redirects must not be cached");
    assert_eq!(cache_control.to_str().unwrap(), "no-cache, no-store, must-revalidate");
}

/// Test that a first visit mints the attribution cookie and records the click
#[tokio::test]
async fn test_first_visit_sets_cookie_and_captures_click() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/out/blue-eye-spring-tour")
        .add_header("User-Agent", "Mozilla/5.0 (integration)")
        .add_header("X-Forwarded-For", "203.0.113.9")
        .await;

    response.assert_status(StatusCode::FOUND);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("first visit must set the attribution cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("_aff="), "got: {set_cookie}");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=7776000"));

    let token = set_cookie
        .trim_start_matches("_aff=")
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let clicks = ctx.events.captured_clicks();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].tour_slug, "blue-eye-spring-tour");
    assert_eq!(clicks[0].tour_id, ctx.tour.id);
    assert_eq!(clicks[0].cookie_id, token, "click must join on the issued token");
    assert_eq!(clicks[0].user_agent.as_deref(), Some("Mozilla/5.0 (integration)"));
    assert_eq!(clicks[0].ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(
        clicks[0].redirect_url,
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    );
}

/// Test that a presented cookie is reused and never re-set
#[tokio::test]
async fn test_presented_cookie_reused_verbatim() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/out/blue-eye-spring-tour")
        .add_header("Cookie", &format!("_aff={}", fixtures::TOKEN_A))
        .await;

    response.assert_status(StatusCode::FOUND);
    assert!(
        response.headers().get(header::SET_COOKIE).is_none(),
        "an existing identity must not be overwritten"
    );
    assert_eq!(ctx.events.captured_clicks()[0].cookie_id, fixtures::TOKEN_A);
}

/// Test that a malformed cookie value is ignored and a fresh identity issued
#[tokio::test]
async fn test_malformed_cookie_gets_fresh_identity() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/out/blue-eye-spring-tour")
        .add_header("Cookie", "_aff=not-a-real-token")
        .await;

    response.assert_status(StatusCode::FOUND);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("junk cookie must be replaced with a fresh one")
        .to_str()
        .unwrap();
    assert!(!set_cookie.contains("not-a-real-token"));

    let recorded = &ctx.events.captured_clicks()[0].cookie_id;
    assert_ne!(recorded, "not-a-real-token");
    assert_eq!(recorded.len(), 32);
}

/// Test unknown slug returns 404
#[tokio::test]
async fn test_unknown_slug_returns_404() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/out/no-such-tour").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not found");
    assert_eq!(ctx.events.click_count(), 0);
}

/// Test a tour without a partner link is indistinguishable from unknown
#[tokio::test]
async fn test_tour_without_partner_link_returns_404() {
    let ctx = TestContext::new();
    let unlinked = fixtures::unlinked_tour();
    ctx.catalog.insert(unlinked.clone());
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get(&format!("/out/{}", unlinked.slug)).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(ctx.events.click_count(), 0);
}

/// Test malformed slug shape is rejected before any store access
#[tokio::test]
async fn test_malformed_slug_returns_400() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for bad in ["Blue-Eye", "blue--eye", "blue_eye", "-blue-eye"] {
        let response = server.get(&format!("/out/{bad}")).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
    assert_eq!(ctx.events.click_count(), 0);
}

/// Test SQL-shaped UTM value rejects the redirect with a plain validation error
#[tokio::test]
async fn test_adversarial_utm_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/out/blue-eye-spring-tour?utm_source=union+select+password+from+users")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"], "Validation failed",
        "threat rejections must read like ordinary validation"
    );
    assert!(
        body.get("details").is_none(),
        "no hint of which signature matched"
    );
    assert_eq!(ctx.events.click_count(), 0);
}

/// Test oversize UTM value is rejected
#[tokio::test]
async fn test_oversize_utm_value_returns_400() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let long_value = "a".repeat(300);
    let response = server
        .get(&format!("/out/blue-eye-spring-tour?utm_campaign={long_value}"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test the redirect still goes out when the click write fails
#[tokio::test]
async fn test_click_write_failure_still_redirects() {
    let ctx = TestContext::new();
    ctx.events.set_fail_clicks(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/out/blue-eye-spring-tour?utm_source=newsletter")
        .await;

    response.assert_status(StatusCode::FOUND);
    assert!(response.headers().get(header::LOCATION).is_some());
    assert_eq!(ctx.events.click_count(), 0, "write failed, nothing captured");
}

/// Test catalog outage maps to 503
#[tokio::test]
async fn test_catalog_outage_returns_503() {
    let ctx = TestContext::new();
    ctx.catalog.set_should_fail(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/out/blue-eye-spring-tour").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Service temporarily unavailable");
}
