//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any database access must therefore be awaited, never blocked on.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use vpo_engine::{db_types::ADMIN_ROLE, traits::UserManagement, AuthApi, NewUserRequest};

use crate::{
    auth::{TokenIssuer, VerifiedClaims},
    data_objects::{JsonResponse, LoginRequest, TokenResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $bound:ident) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $bound:ident where requires $role:expr) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $bound + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new($role));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(registration => Post "/registration" impl UserManagement);
/// Creates a new user account. The role is taken from the request as-is and defaults to `User`.
pub async fn registration<A>(
    body: web::Json<NewUserRequest>,
    api: web::Data<AuthApi<A>>,
) -> Result<HttpResponse, ServerError>
where
    A: UserManagement,
{
    trace!("💻️ Received registration request for {}", body.email);
    let account = api.register(body.into_inner()).await.map_err(|e| {
        debug!("💻️ Registration failed. {e}");
        ServerError::RegistrationFailed(e)
    })?;
    info!("💻️ New user #{} registered with role {}", account.id, account.role);
    Ok(HttpResponse::Ok().json(JsonResponse::new("user registered")))
}

route!(login => Post "/login" impl UserManagement);
/// Route handler for the login endpoint
///
/// Checks the email and password and, if they match, issues an access token carrying the user's id and role. The
/// token is valid for the configured lifetime (a day by default) and will NOT refresh.
pub async fn login<A>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<A>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError>
where
    A: UserManagement,
{
    let LoginRequest { email, password } = body.into_inner();
    trace!("💻️ Received login request for {email}");
    let user = api.login(&email, &password).await.map_err(|e| {
        debug!("💻️ Login failed for {email}. {e}");
        ServerError::LoginFailed(e)
    })?;
    let token = signer.issue_token(&user)?;
    trace!("💻️ Issued access token for user #{}", user.id);
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Echoes the claims of the caller's access token.
pub async fn check_token(claims: VerifiedClaims) -> impl Responder {
    trace!("💻️ Received check_token request for user {:?}", claims.0.sub);
    HttpResponse::Ok().json(claims)
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(users => Get "/users" impl UserManagement where requires ADMIN_ROLE);
pub async fn users<A>(api: web::Data<AuthApi<A>>) -> Result<HttpResponse, ServerError>
where A: UserManagement {
    trace!("💻️ Received request for all users");
    let users = api.all_users().await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    Ok(HttpResponse::Ok().json(users))
}
