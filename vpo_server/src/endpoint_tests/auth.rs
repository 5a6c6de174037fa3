use actix_web::{http::StatusCode, test::TestRequest};
use chrono::Utc;
use log::*;
use serde_json::json;
use vpo_engine::{
    db_types::{NewUser, UserAccount},
    helpers::{hash_password, verify_password},
    AuthApiError,
};
use vpo_jwt::CompatMode;

use super::{helpers::*, mocks::*};
use crate::data_objects::TokenResponse;

fn registration_body() -> serde_json::Value {
    json!({
        "name": "Alex",
        "email": "alex@gmail.com",
        "password": "password123",
        "phonenumber": "1234567890",
        "role": "Admin"
    })
}

fn stored_user(id: i64, role: &str) -> UserAccount {
    UserAccount {
        id,
        name: "Alex".into(),
        email: "alex@gmail.com".into(),
        password: hash_password("password123").unwrap(),
        phonenumber: Some("1234567890".into()),
        role: role.into(),
        created_at: Utc::now(),
    }
}

async fn register(users: MockUserManager, body: serde_json::Value) -> (StatusCode, String) {
    let req = TestRequest::post().uri("/api/v1/auth/registration").set_json(body);
    send_request(req, configure_app(users, CompatMode::Strict)).await
}

async fn login(users: MockUserManager, email: &str, password: &str) -> (StatusCode, String) {
    let req =
        TestRequest::post().uri("/api/v1/auth/login").set_json(json!({ "email": email, "password": password }));
    send_request(req, configure_app(users, CompatMode::Strict)).await
}

#[actix_web::test]
async fn register_new_user() {
    let mut users = MockUserManager::new();
    users.expect_is_email_taken().times(1).returning(|_| Ok(false));
    users
        .expect_create_user()
        .times(1)
        .withf(|u: &NewUser| {
            u.email == "alex@gmail.com" &&
                u.role == "Admin" &&
                u.password_hash != "password123" &&
                verify_password("password123", &u.password_hash)
        })
        .returning(|u| {
            Ok(UserAccount {
                id: 1,
                name: u.name,
                email: u.email,
                password: u.password_hash,
                phonenumber: u.phonenumber,
                role: u.role,
                created_at: Utc::now(),
            })
        });
    let (status, body) = register(users, registration_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"user registered"}"#);
}

#[actix_web::test]
async fn role_defaults_to_user() {
    let mut users = MockUserManager::new();
    users.expect_is_email_taken().returning(|_| Ok(false));
    users
        .expect_create_user()
        .withf(|u: &NewUser| u.role == "User" && u.phonenumber.is_none())
        .returning(|u| Ok(UserAccount { id: 2, email: u.email, role: u.role, ..Default::default() }));
    let body = json!({ "name": "Sam", "email": "sam@example.com", "password": "pw" });
    let (status, _) = register(users, body).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn register_with_taken_email() {
    let mut users = MockUserManager::new();
    users.expect_is_email_taken().returning(|_| Ok(true));
    users.expect_create_user().never();
    let (status, body) = register(users, registration_body()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Email is already taken, please use another email"}"#);
}

#[actix_web::test]
async fn register_with_backend_failure() {
    let mut users = MockUserManager::new();
    users.expect_is_email_taken().returning(|_| Ok(false));
    users.expect_create_user().returning(|_| Err(AuthApiError::DatabaseError("database is locked".into())));
    let (status, body) = register(users, registration_body()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Registration error"}"#);
}

#[actix_web::test]
async fn register_with_incomplete_body() {
    let users = MockUserManager::new();
    let (status, body) = register(users, json!({ "email": "alex@gmail.com" })).await;
    info!("Response body: {body}");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Could not read request body"), "was: {body}");
}

#[actix_web::test]
async fn login_with_valid_credentials() {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().times(1).returning(|email| {
        assert_eq!(email.to_string(), "alex@gmail.com");
        Ok(Some(stored_user(22, "Admin")))
    });
    let (status, body) = login(users, "alex@gmail.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    let TokenResponse { token } = serde_json::from_str(&body).unwrap();
    let claims = test_codec(CompatMode::Strict).verify(&token).unwrap();
    assert_eq!(claims.sub, Some(22));
    assert_eq!(claims.role.as_deref(), Some("Admin"));
    let (iat, exp) = (claims.iat.unwrap(), claims.exp.unwrap());
    assert_eq!(exp - iat, 86_400);
    assert!((Utc::now().timestamp() - iat).abs() < 60);
}

#[actix_web::test]
async fn login_with_unknown_email() {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().returning(|_| Ok(None));
    let (status, body) = login(users, "nobody@example.com", "password123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"The user with nobody@example.com was not found."}"#);
}

#[actix_web::test]
async fn login_with_wrong_password() {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().returning(|_| Ok(Some(stored_user(22, "Admin"))));
    let (status, body) = login(users, "alex@gmail.com", "password124").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Incorrect password"}"#);
}

#[actix_web::test]
async fn login_with_backend_failure() {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().returning(|_| Err(AuthApiError::DatabaseError("no such table".into())));
    let (status, body) = login(users, "alex@gmail.com", "password123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"message":"Login error"}"#);
}

#[actix_web::test]
async fn issued_tokens_open_protected_routes() {
    let mut users = MockUserManager::new();
    users.expect_fetch_user_by_email().returning(|_| Ok(Some(stored_user(3, "User"))));
    let (_, body) = login(users, "alex@gmail.com", "password123").await;
    let TokenResponse { token } = serde_json::from_str(&body).unwrap();

    let req = with_bearer(TestRequest::get().uri("/api/v1/auth/check_token"), &token);
    let (status, body) = send_request(req, configure_app(MockUserManager::new(), CompatMode::Strict)).await;
    assert_eq!(status, StatusCode::OK);
    let claims: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(claims["sub"], 3);
    assert_eq!(claims["role"], "User");
}

#[actix_web::test]
async fn check_token_without_token() {
    let req = TestRequest::get().uri("/api/v1/auth/check_token");
    let (status, body) = send_request(req, configure_app(MockUserManager::new(), CompatMode::Strict)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"message":"User is not authorized"}"#);
}

#[actix_web::test]
async fn wrong_method_on_public_routes_is_not_found() {
    for uri in ["/api/v1/auth/login", "/api/v1/auth/registration", "/api/v1/auth/nothing_here"] {
        let req = TestRequest::get().uri(uri);
        let (status, body) = send_request(req, configure_app(MockUserManager::new(), CompatMode::Strict)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(!body.contains("not authorized"), "{uri}: {body}");
    }
}

#[actix_web::test]
async fn health_needs_no_token() {
    let req = TestRequest::get().uri("/health");
    let (status, _) = send_request(req, configure_app(MockUserManager::new(), CompatMode::Strict)).await;
    assert_eq!(status, StatusCode::OK);
}
