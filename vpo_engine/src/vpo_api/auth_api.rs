//! Registration and login.

use std::fmt::Debug;

use log::{debug, trace};

use crate::{
    db_types::{NewUser, UserAccount},
    helpers::{hash_password, verify_password},
    traits::UserManagement,
    AuthApiError,
    NewUserRequest,
};

/// `AuthApi` checks credentials on behalf of the server. It does not mint tokens; that is the caller's job once
/// [`AuthApi::login`] succeeds.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a new user. Fails with [`AuthApiError::EmailTaken`] if the email address is already in use.
    pub async fn register(&self, request: NewUserRequest) -> Result<UserAccount, AuthApiError> {
        if self.db.is_email_taken(&request.email).await? {
            debug!("🗃️ Registration rejected. {} is already taken", request.email);
            return Err(AuthApiError::EmailTaken);
        }
        let NewUserRequest { name, email, password, phonenumber, role } = request;
        let password_hash = hash_password(&password)?;
        let user = NewUser { name, email, password_hash, phonenumber, role };
        let account = self.db.create_user(user).await?;
        debug!("🗃️ Registered user #{} ({}) with role {}", account.id, account.email, account.role);
        Ok(account)
    }

    /// Checks an email / password pair and returns the matching account.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserAccount, AuthApiError> {
        let user =
            self.db.fetch_user_by_email(email).await?.ok_or_else(|| AuthApiError::UserNotFound(email.to_string()))?;
        if !verify_password(password, &user.password) {
            debug!("🗃️ Incorrect password supplied for user #{}", user.id);
            return Err(AuthApiError::IncorrectPassword);
        }
        trace!("🗃️ Credentials for user #{} are valid", user.id);
        Ok(user)
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<UserAccount>, AuthApiError> {
        self.db.fetch_user_by_id(id).await
    }

    pub async fn all_users(&self) -> Result<Vec<UserAccount>, AuthApiError> {
        self.db.fetch_all_users().await
    }
}
