//! # VPO engine public API
//!
//! An API instance is created by supplying a database backend that implements the backend traits the API needs:
//!
//! ```rust,ignore
//! use vpo_engine::{AuthApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/vpo.db", 5).await?;
//! // SqliteDatabase implements UserManagement
//! let api = AuthApi::new(db);
//! let user = api.login("alex@example.com", "password123").await?;
//! ```

pub mod auth_api;
pub mod auth_objects;
pub mod errors;
