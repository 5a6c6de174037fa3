//! SQLite backend for the VPO engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
