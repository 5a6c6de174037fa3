//! # VPO server
//! This crate hosts the HTTP server for the vehicle parts ordering API. It is responsible for:
//! Registering users and checking their credentials at login.
//! Issuing signed access tokens to users that log in.
//! Checking those tokens, and the role they carry, on every protected request.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/v1/auth/registration`: Creates a user account.
//! * `/api/v1/auth/login`: Exchanges an email and password for an access token.
//! * `/api/v1/auth/check_token`: Returns the claims of the caller's access token.
//! * `/api/v1/users`: Lists all users. Admins only.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
