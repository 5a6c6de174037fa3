use actix_web::{
    http::{header::AUTHORIZATION, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use log::debug;
use vpo_jwt::{CompatMode, TokenCodec};

use super::mocks::MockUserManager;
use crate::{
    config::AuthConfig,
    server::{app_state, configure_routes},
};

// DO NOT re-use this secret anywhere.
pub const TEST_SECRET: &str = "SECRET_KEY_RANDOM";

pub fn test_codec(mode: CompatMode) -> TokenCodec {
    AuthConfig::new(TEST_SECRET, 86_400, mode).token_codec()
}

pub fn issue_token(sub: i64, role: &str) -> String {
    test_codec(CompatMode::Strict).issue_access_token(sub, role).expect("Failed to sign token")
}

pub fn with_bearer(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

/// Wires the full route table up to a mocked user store, the same way the server does.
pub fn configure_app(users: MockUserManager, mode: CompatMode) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let codec = test_codec(mode);
        let (auth_api, signer) = app_state(users, codec.clone());
        cfg.app_data(auth_api).app_data(signer);
        configure_routes::<MockUserManager>(cfg, codec);
    }
}

pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let _ = env_logger::try_init();
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request");
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}
