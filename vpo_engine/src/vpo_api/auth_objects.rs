use serde::{Deserialize, Serialize};

use crate::db_types::USER_ROLE;

/// A registration request, as submitted by a client. The password is in the clear at this point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phonenumber: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    USER_ROLE.to_string()
}
