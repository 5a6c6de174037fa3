use std::{fmt::Debug, sync::Arc};

use log::debug;
use vpo_common::Secret;

use crate::{
    token::{issue_with_mode, verify_at, DEFAULT_TOKEN_VALIDITY},
    Claims,
    Clock,
    CompatMode,
    SystemClock,
    TokenError,
};

/// Everything needed to mint and check tokens: the shared secret, the compatibility mode, a clock and the lifetime of
/// freshly issued access tokens.
///
/// Cloning is cheap and the codec holds no mutable state, so one instance can be handed to every worker.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Secret<String>,
    mode: CompatMode,
    clock: Arc<dyn Clock>,
    validity: i64,
}

impl Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenCodec (secret: {}, mode: {}, validity: {}s)", self.secret, self.mode, self.validity)
    }
}

impl TokenCodec {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret, mode: CompatMode::default(), clock: Arc::new(SystemClock), validity: DEFAULT_TOKEN_VALIDITY }
    }

    pub fn with_mode(mut self, mode: CompatMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sets the lifetime of tokens minted by [`Self::issue_access_token`], in seconds.
    pub fn with_validity(mut self, seconds: i64) -> Self {
        self.validity = seconds;
        self
    }

    pub fn mode(&self) -> CompatMode {
        self.mode
    }

    pub fn validity(&self) -> i64 {
        self.validity
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Mints a token carrying exactly `claims`. No temporal claims are added.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        issue_with_mode(claims, self.secret.reveal(), self.mode)
    }

    /// Mints an access token for user `sub` with the given role, valid from now for the configured validity period.
    pub fn issue_access_token(&self, sub: i64, role: &str) -> Result<String, TokenError> {
        let now = self.clock.now();
        let expiry = now.checked_add(self.validity).ok_or_else(|| {
            TokenError::MalformedToken(format!("Expiry of {now} + {}s is out of range", self.validity))
        })?;
        let claims = Claims::new().with_subject(sub).with_role(role).with_issued_at(now).with_expiry(expiry);
        debug!("🔐️ Issuing access token for user #{sub} ({role}), expiring at {expiry}");
        self.issue(&claims)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        verify_at(token, self.secret.reveal(), self.clock.now(), self.mode)
    }
}
