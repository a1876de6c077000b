//! # kekboard-api
//!
//! HTTP read surface built with Axum: the cached stats list and health probes.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{bind, create_app, serve};
pub use state::AppState;
