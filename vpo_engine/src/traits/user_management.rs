use crate::{
    db_types::{NewUser, UserAccount},
    AuthApiError,
};

/// The `UserManagement` trait defines the storage behaviour that registration and login rely on.
///
/// Backends only store and fetch rows. Hashing and checking passwords is handled by [`crate::AuthApi`], so
/// implementations never see a plain-text password.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Returns true if an account with the given email address already exists.
    async fn is_email_taken(&self, email: &str) -> Result<bool, AuthApiError>;

    /// Inserts a new user and returns the stored account, including its new id.
    async fn create_user(&self, user: NewUser) -> Result<UserAccount, AuthApiError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthApiError>;

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<UserAccount>, AuthApiError>;

    /// Fetches every account, ordered by id.
    async fn fetch_all_users(&self) -> Result<Vec<UserAccount>, AuthApiError>;
}
