//! HTTP handler modules for the snakehunt API.
//!
//! Each sub-module implements thin handlers that extract the caller, check
//! its role, acquire the service lock, delegate to [`GameService`], and wrap
//! the result in an [`ApiResponse`]. No business logic lives in handlers.
//!
//! [`GameService`]: crate::service::GameService
//! [`ApiResponse`]: crate::schema::common::ApiResponse

pub mod admin;
pub mod auth;
pub mod health;
pub mod leaderboard;
pub mod participant;
pub mod superadmin;
