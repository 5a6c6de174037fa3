use std::{fmt::Display, str::FromStr};

/// Selects between the standard token behaviour and bit-for-bit compatibility with tokens minted by earlier
/// deployments.
///
/// | behaviour                       | `Strict`                           | `Legacy`                          |
/// |---------------------------------|------------------------------------|-----------------------------------|
/// | keys longer than 64 bytes       | digested first (RFC 2104)          | truncated to 64 bytes             |
/// | signature text                  | trailing `=` padding stripped      | last character always dropped     |
/// | token header                    | `alg` must be `HS256`, `typ` `JWT` | decoded but not checked           |
/// | `OPTIONS` requests              | skip authentication                | still authenticated               |
/// | `exp`/`iat` equal to zero       | checked                            | ignored                           |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompatMode {
    #[default]
    Strict,
    Legacy,
}

impl CompatMode {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy)
    }
}

impl Display for CompatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

impl FromStr for CompatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("Unknown compatibility mode: {other}. Expected 'strict' or 'legacy'")),
        }
    }
}
