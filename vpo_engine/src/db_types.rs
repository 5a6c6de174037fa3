use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const ADMIN_ROLE: &str = "Admin";
pub const USER_ROLE: &str = "User";

/// A row in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Salted password hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub phonenumber: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl Default for UserAccount {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::default(),
            email: String::default(),
            password: String::default(),
            phonenumber: None,
            role: USER_ROLE.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// A user that is ready to be inserted. The password has already been hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phonenumber: Option<String>,
    pub role: String,
}
