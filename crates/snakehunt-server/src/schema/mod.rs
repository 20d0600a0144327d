//! Request and response types for the HTTP API.
//!
//! Entities from `snakehunt_core::model` are serialized as-is; the types
//! here add request bodies, query filters and composite views.

pub mod admin;
pub mod auth;
pub mod common;
pub mod leaderboard;
pub mod participant;
pub mod superadmin;
