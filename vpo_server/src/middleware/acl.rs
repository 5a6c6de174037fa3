//! Access control middleware.
//!
//! Wrap a route or scope with [`AclMiddlewareFactory`] to restrict it to a single role. It must sit inside
//! [`super::JwtAuthMiddlewareFactory`], since it relies on the claims that middleware stores in the request extensions.
//! A request whose token carries a different role gets a 403 with "Access denied". A request that reaches this
//! middleware with no claims at all was never authenticated and gets the "User is not authorized" 403 instead, unless
//! it is an `OPTIONS` preflight that the token middleware let through.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace};
use vpo_jwt::Claims;

use crate::errors::AuthError;

pub struct AclMiddlewareFactory {
    required_role: String,
}

impl AclMiddlewareFactory {
    pub fn new(required_role: &str) -> Self {
        AclMiddlewareFactory { required_role: required_role.to_string() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<EitherBody<B>>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AclMiddlewareService { required_role: self.required_role.clone(), service: Rc::new(service) }))
    }
}

pub struct AclMiddlewareService<S> {
    required_role: String,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        let required_role = self.required_role.clone();
        Box::pin(async move {
            let check = match req.extensions().get::<Claims>() {
                Some(claims) if claims.has_role(&required_role) => Ok(()),
                Some(claims) => {
                    debug!("🔐️ Role {:?} may not access {}", claims.role, req.path());
                    Err(AuthError::InsufficientRole(required_role.clone()))
                },
                None if req.method() == Method::OPTIONS => Ok(()),
                None => Err(AuthError::MissingCredential),
            };
            match check {
                Ok(()) => {
                    trace!("🔐️ Role check passed for {}", req.path());
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                },
                Err(e) => Ok(req.error_response(e).map_into_right_body()),
            }
        })
    }
}
