use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use actix_web::{
    http::{header::AUTHORIZATION, Method, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
    HttpResponse,
};
use vpo_common::Secret;
use vpo_jwt::{Claims, CompatMode, FixedClock, TokenCodec};

use super::helpers::*;
use crate::{
    auth::VerifiedClaims,
    middleware::{AclMiddlewareFactory, JwtAuthMiddlewareFactory},
};

const NOT_AUTHORIZED: &str = r#"{"message":"User is not authorized"}"#;
const ACCESS_DENIED: &str = r#"{"message":"Access denied"}"#;

async fn echo_claims(claims: VerifiedClaims) -> HttpResponse {
    HttpResponse::Ok().json(claims)
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// A single resource behind the token middleware and, optionally, a role gate.
fn guarded(mode: CompatMode, role: Option<&'static str>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let resource = web::resource("/api/v1/users")
            .route(web::get().to(echo_claims))
            .route(web::method(Method::OPTIONS).to(preflight));
        match role {
            Some(role) => cfg.service(
                resource.wrap(AclMiddlewareFactory::new(role)).wrap(JwtAuthMiddlewareFactory::new(test_codec(mode))),
            ),
            None => cfg.service(resource.wrap(JwtAuthMiddlewareFactory::new(test_codec(mode)))),
        };
    }
}

fn get_users() -> TestRequest {
    TestRequest::get().uri("/api/v1/users")
}

#[actix_web::test]
async fn matching_role_passes_through() {
    let req = with_bearer(get_users(), &issue_token(1, "Admin"));
    let (status, body) = send_request(req, guarded(CompatMode::Strict, Some("Admin"))).await;
    assert_eq!(status, StatusCode::OK);
    let claims: Claims = serde_json::from_str(&body).unwrap();
    assert_eq!(claims.sub, Some(1));
    assert_eq!(claims.role.as_deref(), Some("Admin"));
}

#[actix_web::test]
async fn mismatched_role_is_denied() {
    let req = with_bearer(get_users(), &issue_token(1, "Admin"));
    let (status, body) = send_request(req, guarded(CompatMode::Strict, Some("User"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, ACCESS_DENIED);
}

#[actix_web::test]
async fn role_match_is_exact() {
    let req = with_bearer(get_users(), &issue_token(1, "admin"));
    let (status, body) = send_request(req, guarded(CompatMode::Strict, Some("Admin"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, ACCESS_DENIED);
}

#[actix_web::test]
async fn missing_authorization_header() {
    for role in [None, Some("Admin")] {
        let (status, body) = send_request(get_users(), guarded(CompatMode::Strict, role)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, NOT_AUTHORIZED);
    }
}

#[actix_web::test]
async fn malformed_authorization_headers() {
    let token = issue_token(1, "Admin");
    for header in [
        "Bearer".to_string(),
        "Bearer ".to_string(),
        format!("bearer {token}"),
        format!("Basic {token}"),
        token.clone(),
        "Bearer not-a-token".to_string(),
        "Bearer a.b".to_string(),
    ] {
        let req = get_users().insert_header((AUTHORIZATION, header.clone()));
        let (status, body) = send_request(req, guarded(CompatMode::Strict, Some("Admin"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{header}");
        assert_eq!(body, NOT_AUTHORIZED, "{header}");
    }
}

#[actix_web::test]
async fn tampered_tokens_are_rejected() {
    let token = issue_token(1, "User");
    let (head, rest) = token.split_once('.').unwrap();
    let (_, signature) = rest.split_once('.').unwrap();
    // Same signature, promoted role
    let forged_payload = vpo_jwt::base64url::encode(r#"{"sub":1,"role":"Admin"}"#);
    let forged = format!("{head}.{forged_payload}.{signature}");
    let req = with_bearer(get_users(), &forged);
    let (status, body) = send_request(req, guarded(CompatMode::Strict, Some("Admin"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, NOT_AUTHORIZED);
}

#[actix_web::test]
async fn tokens_from_another_secret_are_rejected() {
    let token = TokenCodec::new(Secret::from("some other secret")).issue_access_token(1, "Admin").unwrap();
    let req = with_bearer(get_users(), &token);
    let (status, body) = send_request(req, guarded(CompatMode::Strict, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, NOT_AUTHORIZED);
}

#[actix_web::test]
async fn expired_tokens_are_rejected() {
    // Issued and expired long ago
    let codec = test_codec(CompatMode::Strict).with_clock(FixedClock(1_000_000));
    let token = codec.issue_access_token(1, "Admin").unwrap();
    let req = with_bearer(get_users(), &token);
    let (status, body) = send_request(req, guarded(CompatMode::Strict, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, NOT_AUTHORIZED);
}

#[actix_web::test]
async fn tokens_from_the_future_are_rejected() {
    let now = chrono::Utc::now().timestamp();
    let codec = test_codec(CompatMode::Strict).with_clock(FixedClock(now + 3600));
    let token = codec.issue_access_token(1, "Admin").unwrap();
    let req = with_bearer(get_users(), &token);
    let (status, body) = send_request(req, guarded(CompatMode::Strict, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, NOT_AUTHORIZED);
}

#[actix_web::test]
async fn denied_requests_never_reach_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let configure = move |cfg: &mut ServiceConfig| {
        let handler = move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                HttpResponse::Ok().finish()
            }
        };
        cfg.service(
            web::resource("/api/v1/users")
                .route(web::get().to(handler))
                .wrap(AclMiddlewareFactory::new("Admin"))
                .wrap(JwtAuthMiddlewareFactory::new(test_codec(CompatMode::Strict))),
        );
    };
    let (status, _) = send_request(get_users(), configure.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let req = with_bearer(get_users(), &issue_token(2, "User"));
    let (status, _) = send_request(req, configure.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let req = with_bearer(get_users(), &issue_token(1, "Admin"));
    let (status, _) = send_request(req, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn preflight_skips_authentication_in_strict_mode() {
    let req = TestRequest::default().method(Method::OPTIONS).uri("/api/v1/users");
    let (status, _) = send_request(req, guarded(CompatMode::Strict, Some("Admin"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn preflight_is_still_authenticated_in_legacy_mode() {
    let req = TestRequest::default().method(Method::OPTIONS).uri("/api/v1/users");
    let (status, body) = send_request(req, guarded(CompatMode::Legacy, Some("Admin"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, NOT_AUTHORIZED);

    let req =
        with_bearer(TestRequest::default().method(Method::OPTIONS).uri("/api/v1/users"), &issue_token(1, "User"));
    let (status, body) = send_request(req, guarded(CompatMode::Legacy, Some("Admin"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, ACCESS_DENIED);

    let req =
        with_bearer(TestRequest::default().method(Method::OPTIONS).uri("/api/v1/users"), &issue_token(1, "Admin"));
    let (status, _) = send_request(req, guarded(CompatMode::Legacy, Some("Admin"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn legacy_servers_accept_legacy_tokens() {
    let token = test_codec(CompatMode::Legacy).issue_access_token(5, "Admin").unwrap();
    let req = with_bearer(get_users(), &token);
    let (status, _) = send_request(req, guarded(CompatMode::Legacy, Some("Admin"))).await;
    assert_eq!(status, StatusCode::OK);
}
