use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::token::{ALGORITHM, TOKEN_TYPE};

/// The token header. Always `{"alg":"HS256","typ":"JWT"}` on tokens minted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self { alg: ALGORITHM.to_string(), typ: Some(TOKEN_TYPE.to_string()) }
    }
}

/// Payload keys with a typed field on [`Claims`]. They never appear in [`Claims::extra`] after parsing.
pub const REGISTERED_CLAIMS: [&str; 4] = ["sub", "role", "iat", "exp"];

/// The token payload.
///
/// None of the recognised fields are mandatory. `exp` and `iat` are only checked when they are present. Any other
/// fields in the payload are kept in `extra` and survive a round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<i64>,
    /// Authorisation tier, e.g. `Admin` or `User`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued at, in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry, in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, sub: i64) -> Self {
        self.sub = Some(sub);
        self
    }

    pub fn with_role<S: Into<String>>(mut self, role: S) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    pub fn with_expiry(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Adds a payload field. Registered claims of the right JSON type are stored in their typed field; anything else
    /// goes into `extra`.
    pub fn with_claim<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        let (key, value) = (key.into(), value.into());
        let typed = match (key.as_str(), &value) {
            ("sub", Value::Number(n)) => n.as_i64().map(|v| self.sub = Some(v)),
            ("iat", Value::Number(n)) => n.as_i64().map(|v| self.iat = Some(v)),
            ("exp", Value::Number(n)) => n.as_i64().map(|v| self.exp = Some(v)),
            ("role", Value::String(s)) => {
                self.role = Some(s.clone());
                Some(())
            },
            _ => None,
        };
        if typed.is_none() {
            self.extra.insert(key, value);
        }
        self
    }

    /// The first registered claim that has been put into `extra`, if any. Such a payload could not be parsed back.
    pub fn shadowed_claim(&self) -> Option<&'static str> {
        REGISTERED_CLAIMS.into_iter().find(|k| self.extra.contains_key(*k))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}
