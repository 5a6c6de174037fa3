//! Sqlite database operations for user accounts.
//!
//! Clients should not call these methods directly, and prefer the [`UserManagement`] trait methods that are
//! implemented on the [`SqliteDatabase`] struct instead.
//!
//! [`UserManagement`]: crate::UserManagement
//! [`SqliteDatabase`]: crate::SqliteDatabase

use log::debug;
use sqlx::{Row, SqliteConnection};

use crate::{
    db_types::{NewUser, UserAccount},
    AuthApiError,
};

pub async fn email_exists(email: &str, conn: &mut SqliteConnection) -> Result<bool, AuthApiError> {
    let exists = sqlx::query("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(conn)
        .await?
        .get::<bool, usize>(0);
    Ok(exists)
}

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<UserAccount, AuthApiError> {
    let account: UserAccount = sqlx::query_as(
        r#"
    INSERT INTO users (name, email, password, phonenumber, role)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING *
    "#,
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.phonenumber)
    .bind(user.role)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ User #{} inserted", account.id);
    Ok(account)
}

pub async fn user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, AuthApiError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, AuthApiError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn all_users(conn: &mut SqliteConnection) -> Result<Vec<UserAccount>, AuthApiError> {
    let users = sqlx::query_as("SELECT * FROM users ORDER BY id ASC").fetch_all(conn).await?;
    Ok(users)
}
