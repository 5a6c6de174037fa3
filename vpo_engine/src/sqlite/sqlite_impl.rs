//! `SqliteDatabase` is a concrete implementation of a VPO engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
//!
//! [`traits`]: crate::traits
use std::fmt::Debug;

use log::*;
use sqlx::{migrate, migrate::MigrateError, SqlitePool};

use super::db::{new_pool, users};
use crate::{
    db_types::{NewUser, UserAccount},
    traits::UserManagement,
    AuthApiError,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

impl UserManagement for SqliteDatabase {
    async fn is_email_taken(&self, email: &str) -> Result<bool, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::email_exists(email, &mut conn).await
    }

    async fn create_user(&self, user: NewUser) -> Result<UserAccount, AuthApiError> {
        let mut tx = self.pool.begin().await?;
        if users::email_exists(&user.email, &mut tx).await? {
            return Err(AuthApiError::EmailTaken);
        }
        let account = users::insert_user(user, &mut tx).await?;
        tx.commit().await?;
        Ok(account)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::user_by_email(email, &mut conn).await
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<UserAccount>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::user_by_id(id, &mut conn).await
    }

    async fn fetch_all_users(&self) -> Result<Vec<UserAccount>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::all_users(&mut conn).await
    }
}
