//! VPO Engine
//!
//! The engine owns user accounts and answers the one question the token layer cannot answer by itself: "are these
//! credentials good?". It is split the same way as the rest of the server stack:
//!
//! 1. Storage ([`SqliteDatabase`]). Backends implement the [`UserManagement`] trait; SQLite is the only one shipped.
//!    Schema changes live in embedded migrations and are applied by [`SqliteDatabase::run_migrations`].
//! 2. The public API ([`AuthApi`]), which handles registration and login on top of any [`UserManagement`] backend.
//!
//! Passwords are never stored in the clear; see [`helpers::hash_password`].

pub mod db_types;
pub mod helpers;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;
mod vpo_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::UserManagement;
pub use vpo_api::{auth_api::AuthApi, auth_objects::NewUserRequest, errors::AuthApiError};
