//! Rate limiting integration tests.
//!
//! Exercises the per-tier fixed-window quotas through the real
//! router, with the client key derived from forwarded headers.

use axum::http::StatusCode;
use axum_test::TestServer;
use guard::{RateTiers, TierLimit};
use integration_tests::{fixtures, setup::TestContext};

fn tiers(booking: u64, redirect: u64) -> RateTiers {
    RateTiers {
        booking: TierLimit {
            limit: booking,
            window_secs: 60,
        },
        redirect: TierLimit {
            limit: redirect,
            window_secs: 60,
        },
        ..RateTiers::default()
    }
}

/// Test the booking quota exhausts at its limit with a Retry-After hint
#[tokio::test]
async fn test_booking_quota_exhausts_at_limit() {
    let ctx = TestContext::with_tiers(tiers(3, 30));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..3 {
        let response = server
            .post("/api/inquiries")
            .content_type("application/json")
            .add_header("X-Forwarded-For", "198.51.100.7")
            .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
            .await;
        response.assert_status(StatusCode::OK);
    }

    let response = server
        .post("/api/inquiries")
        .content_type("application/json")
        .add_header("X-Forwarded-For", "198.51.100.7")
        .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Too many requests");

    let retry_after: u64 = response
        .headers()
        .get("Retry-After")
        .expect("429 must carry Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .expect("Retry-After must be integer seconds");
    assert!((1..=60).contains(&retry_after), "got {retry_after}");

    assert_eq!(ctx.events.inquiry_count(), 3, "the denied submission is not stored");
}

/// Test the production default of ten bookings per minute
#[tokio::test]
async fn test_default_booking_limit_is_ten_per_minute() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for i in 0..10 {
        let response = server
            .post("/api/inquiries")
            .content_type("application/json")
            .add_header("X-Forwarded-For", "198.51.100.8")
            .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::OK,
            "submission {} of 10 should be within quota",
            i + 1
        );
    }

    let response = server
        .post("/api/inquiries")
        .content_type("application/json")
        .add_header("X-Forwarded-For", "198.51.100.8")
        .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Test quotas are tracked per client IP
#[tokio::test]
async fn test_separate_ips_have_separate_quotas() {
    let ctx = TestContext::with_tiers(tiers(1, 30));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let first = server
        .post("/api/inquiries")
        .content_type("application/json")
        .add_header("X-Forwarded-For", "198.51.100.10")
        .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
        .await;
    first.assert_status(StatusCode::OK);

    let exhausted = server
        .post("/api/inquiries")
        .content_type("application/json")
        .add_header("X-Forwarded-For", "198.51.100.10")
        .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
        .await;
    exhausted.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let other_ip = server
        .post("/api/inquiries")
        .content_type("application/json")
        .add_header("X-Forwarded-For", "198.51.100.11")
        .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
        .await;
    other_ip.assert_status(StatusCode::OK);
}

/// Test the redirect quota is scoped per tour slug
#[tokio::test]
async fn test_redirect_quota_scoped_per_slug() {
    let ctx = TestContext::with_tiers(tiers(10, 2));
    let second = fixtures::theth_tour();
    ctx.catalog.insert(second.clone());
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..2 {
        let response = server
            .get("/out/blue-eye-spring-tour")
            .add_header("X-Forwarded-For", "198.51.100.20")
            .await;
        response.assert_status(StatusCode::FOUND);
    }

    let denied = server
        .get("/out/blue-eye-spring-tour")
        .add_header("X-Forwarded-For", "198.51.100.20")
        .await;
    denied.assert_status(StatusCode::TOO_MANY_REQUESTS);

    // Same visitor, different tour: its own bucket.
    let other_slug = server
        .get(&format!("/out/{}", second.slug))
        .add_header("X-Forwarded-For", "198.51.100.20")
        .await;
    other_slug.assert_status(StatusCode::FOUND);
}

/// Test rejected submissions never consume quota
#[tokio::test]
async fn test_rejected_submissions_do_not_consume_quota() {
    let ctx = TestContext::with_tiers(tiers(2, 30));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Three malformed submissions, all refused before the limiter runs.
    for _ in 0..3 {
        let response = server
            .post("/api/inquiries")
            .content_type("application/json")
            .add_header("X-Forwarded-For", "198.51.100.30")
            .bytes("{broken".into())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    // The full quota is still available.
    for _ in 0..2 {
        let response = server
            .post("/api/inquiries")
            .content_type("application/json")
            .add_header("X-Forwarded-For", "198.51.100.30")
            .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
            .await;
        response.assert_status(StatusCode::OK);
    }

    let response = server
        .post("/api/inquiries")
        .content_type("application/json")
        .add_header("X-Forwarded-For", "198.51.100.30")
        .bytes(fixtures::inquiry_payload(&ctx.tour).to_string().into())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}
