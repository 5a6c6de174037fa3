//! Bearer token middleware.
//!
//! Reads the access token from the `Authorization: Bearer <token>` header and checks it with the server's
//! [`TokenCodec`]. On success the decoded [`Claims`] are stored in the request extensions, where handlers pick them up
//! via [`crate::auth::VerifiedClaims`] and where [`super::AclMiddlewareFactory`] looks for them. Otherwise the request
//! is answered with a 403 and the wrapped service is never called.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header::AUTHORIZATION, Method},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace};
use vpo_jwt::{Claims, TokenCodec};

use crate::errors::AuthError;

pub const BEARER: &str = "Bearer";

pub struct JwtAuthMiddlewareFactory {
    codec: TokenCodec,
}

impl JwtAuthMiddlewareFactory {
    pub fn new(codec: TokenCodec) -> Self {
        JwtAuthMiddlewareFactory { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<EitherBody<B>>;
    type Transform = JwtAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService { codec: self.codec.clone(), service: Rc::new(service) }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    codec: TokenCodec,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<EitherBody<B>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let codec = self.codec.clone();
        Box::pin(async move {
            if req.method() == Method::OPTIONS && !codec.mode().is_legacy() {
                trace!("🔐️ Preflight request. Skipping token checks.");
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }
            match authenticate(&req, &codec) {
                Ok(claims) => {
                    trace!("🔐️ Access token accepted for user {:?} ({:?})", claims.sub, claims.role);
                    req.extensions_mut().insert(claims);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => {
                    debug!("🔐️ Denying access to {}. {e}", req.path());
                    Ok(req.error_response(e).map_into_right_body())
                },
            }
        })
    }
}

fn authenticate(req: &ServiceRequest, codec: &TokenCodec) -> Result<Claims, AuthError> {
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()).ok_or(AuthError::MissingCredential)?;
    let token = bearer_token(header).ok_or(AuthError::MissingCredential)?;
    Ok(codec.verify(token)?)
}

/// Splits `Bearer <token>` on the first space. The scheme is case-sensitive.
pub fn bearer_token(header: &str) -> Option<&str> {
    match header.split_once(' ') {
        Some((BEARER, token)) if !token.is_empty() => Some(token),
        _ => None,
    }
}
