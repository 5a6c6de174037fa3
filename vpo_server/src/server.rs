use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use vpo_engine::{traits::UserManagement, AuthApi, SqliteDatabase};
use vpo_jwt::TokenCodec;

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    middleware::JwtAuthMiddlewareFactory,
    routes::{check_token, health, LoginRoute, RegistrationRoute, UsersRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let codec = config.auth.token_codec();
    info!("🚀️ Access tokens are valid for {}s ({} mode)", codec.validity(), codec.mode());
    let srv = HttpServer::new(move || {
        let (auth_api, jwt_signer) = app_state(db.clone(), codec.clone());
        let codec = codec.clone();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("vpo::access_log"))
            .app_data(auth_api)
            .app_data(jwt_signer)
            .configure(|cfg| configure_routes::<SqliteDatabase>(cfg, codec))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route. Login and registration are public; everything else under `/api/v1` needs a valid access
/// token.
///
/// `/api/v1/auth` is its own scope, registered ahead of `/api/v1`, so unmatched requests under it are answered with a
/// 404 rather than by the token check.
pub fn configure_routes<B>(cfg: &mut web::ServiceConfig, codec: TokenCodec)
where B: UserManagement + 'static {
    let json_config =
        web::JsonConfig::default().error_handler(|e, _req| ServerError::InvalidRequestBody(e.to_string()).into());
    cfg.app_data(json_config)
        .service(health)
        .service(
            web::scope("/api/v1/auth")
                .service(RegistrationRoute::<B>::new())
                .service(LoginRoute::<B>::new())
                .service(
                    web::resource("/check_token")
                        .wrap(JwtAuthMiddlewareFactory::new(codec.clone()))
                        .route(web::get().to(check_token)),
                ),
        )
        .service(web::scope("/api/v1").wrap(JwtAuthMiddlewareFactory::new(codec)).service(UsersRoute::<B>::new()));
}

/// Builds the per-worker application state for any [`UserManagement`] backend.
pub fn app_state<B: UserManagement>(db: B, codec: TokenCodec) -> (web::Data<AuthApi<B>>, web::Data<TokenIssuer>) {
    (web::Data::new(AuthApi::new(db)), web::Data::new(TokenIssuer::new(codec)))
}
