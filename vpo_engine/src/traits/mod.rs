mod user_management;

pub use user_management::UserManagement;

pub use crate::vpo_api::errors::AuthApiError;
