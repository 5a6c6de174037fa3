use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use log::debug;
use serde::Serialize;
use vpo_engine::db_types::UserAccount;
use vpo_jwt::{Claims, TokenCodec};

use crate::errors::{AuthError, ServerError};

/// The claims of a request that made it through [`crate::middleware::JwtAuthMiddlewareFactory`].
///
/// Handlers take this as an argument to learn who is calling. Extraction fails with a 403 on routes that are not
/// behind the token middleware.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VerifiedClaims(pub Claims);

impl FromRequest for VerifiedClaims {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        ready(claims.map(Self).ok_or(AuthError::MissingCredential))
    }
}

/// Mints access tokens for users that have just logged in.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Issue a new access token for `user`, carrying its id and role.
    /// This method DOES NOT check the user's credentials. That must be done prior to calling `issue_token`.
    pub fn issue_token(&self, user: &UserAccount) -> Result<String, ServerError> {
        let token = self.codec.issue_access_token(user.id, &user.role).map_err(|e| {
            debug!("🔐️ Could not issue access token for user #{}. {e}", user.id);
            ServerError::CouldNotSerializeAccessToken(e.to_string())
        })?;
        Ok(token)
    }
}
