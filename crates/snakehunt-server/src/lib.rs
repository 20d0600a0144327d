//! HTTP/JSON API server for a room-based Snake & Ladders event.
//!
//! Participants roll and answer, room admins approve arrivals and mark
//! answers, superadmins set the event up. This crate contains the service
//! layer that drives the game state machine over SQLite, plus the axum
//! router, API schema types, authentication and error handling.

pub mod audit;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
