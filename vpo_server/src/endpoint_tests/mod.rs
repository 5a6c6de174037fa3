mod auth;
mod helpers;
mod middleware;
mod mocks;
