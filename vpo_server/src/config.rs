use std::env;

use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use vpo_common::Secret;
use vpo_jwt::{CompatMode, TokenCodec, DEFAULT_TOKEN_VALIDITY, MAX_TOKEN_VALIDITY};

use crate::errors::ServerError;

const DEFAULT_VPO_HOST: &str = "127.0.0.1";
const DEFAULT_VPO_PORT: u16 = 8360;
const DEFAULT_VPO_DATABASE_URL: &str = "sqlite://data/vpo.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_VPO_HOST.to_string(),
            port: DEFAULT_VPO_PORT,
            database_url: DEFAULT_VPO_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("VPO_HOST").ok().unwrap_or_else(|| DEFAULT_VPO_HOST.into());
        let port = env::var("VPO_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for VPO_PORT. {e} Using the default, {DEFAULT_VPO_PORT}, instead."
                    );
                    DEFAULT_VPO_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_VPO_PORT);
        let database_url = env::var("VPO_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ VPO_DATABASE_URL is not set. Using the default, {DEFAULT_VPO_DATABASE_URL}.");
            DEFAULT_VPO_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify access tokens.
    pub secret: Secret<String>,
    /// Lifetime of freshly issued access tokens, in seconds.
    pub token_validity: i64,
    pub compat_mode: CompatMode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The token secret has not been set. I'm using a random value for this session. DO NOT operate on \
             production like this since every access token will be invalidated when the server restarts. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        Self { secret: Secret::new(secret), token_validity: DEFAULT_TOKEN_VALIDITY, compat_mode: CompatMode::default() }
    }
}

impl AuthConfig {
    pub fn new(secret: &str, token_validity: i64, compat_mode: CompatMode) -> Self {
        Self { secret: Secret::from(secret), token_validity, compat_mode }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("VPO_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [VPO_SECRET]")))?;
        if secret.is_empty() {
            return Err(ServerError::ConfigurationError("VPO_SECRET is empty".to_string()));
        }
        let token_validity = match env::var("VPO_TOKEN_VALIDITY") {
            Ok(s) => parse_token_validity(&s)?,
            Err(_) => {
                debug!("🪛️ VPO_TOKEN_VALIDITY is not set. Using the default of {DEFAULT_TOKEN_VALIDITY}s.");
                DEFAULT_TOKEN_VALIDITY
            },
        };
        let compat_mode = match env::var("VPO_COMPAT_MODE") {
            Ok(s) => s.parse::<CompatMode>().map_err(ServerError::ConfigurationError)?,
            Err(_) => CompatMode::default(),
        };
        if compat_mode.is_legacy() {
            warn!("🪛️ Running in legacy compatibility mode. Long secrets are truncated and token headers are not checked.");
        }
        Ok(Self { secret: Secret::new(secret), token_validity, compat_mode })
    }

    /// Builds the codec that every worker uses to mint and check tokens.
    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(self.secret.clone()).with_mode(self.compat_mode).with_validity(self.token_validity)
    }
}

/// Token lifetimes are whole seconds in `1..=MAX_TOKEN_VALIDITY`.
fn parse_token_validity(s: &str) -> Result<i64, ServerError> {
    s.trim().parse::<i64>().ok().filter(|v| (1..=MAX_TOKEN_VALIDITY).contains(v)).ok_or_else(|| {
        ServerError::ConfigurationError(format!(
            "Invalid token lifetime in VPO_TOKEN_VALIDITY: {s}. Expected 1 to {MAX_TOKEN_VALIDITY} seconds"
        ))
    })
}
