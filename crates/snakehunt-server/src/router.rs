//! Router assembly for the snakehunt HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
/// CORS is permissive (the dashboards are served from their own origin).
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Session
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route("/leaderboard", get(handlers::leaderboard::leaderboard))
        // Participant
        .route("/team", get(handlers::participant::team_state))
        .route("/team/roll", post(handlers::participant::roll))
        .route("/team/rolls", get(handlers::participant::rolls))
        .route("/team/answer", post(handlers::participant::submit_answer))
        .route("/team/hint", post(handlers::participant::use_hint))
        // Room admin
        .route(
            "/admin/checkpoints",
            get(handlers::admin::list_checkpoints),
        )
        .route(
            "/admin/checkpoints/{id}/approve",
            post(handlers::admin::approve_checkpoint),
        )
        .route(
            "/admin/assignments",
            get(handlers::admin::list_assignments),
        )
        .route(
            "/admin/assignments/{id}/mark",
            post(handlers::admin::mark_answer),
        )
        .route("/admin/teams", get(handlers::admin::list_teams))
        .route("/admin/teams/{id}", get(handlers::admin::team_detail))
        .route("/admin/teams/{id}/time", post(handlers::admin::adjust_time))
        // Event setup
        .route(
            "/superadmin/rooms",
            get(handlers::superadmin::list_rooms).post(handlers::superadmin::create_room),
        )
        .route(
            "/superadmin/rooms/{id}",
            patch(handlers::superadmin::update_room),
        )
        .route(
            "/superadmin/maps",
            get(handlers::superadmin::list_maps).post(handlers::superadmin::create_map),
        )
        .route(
            "/superadmin/maps/{id}/rules",
            post(handlers::superadmin::add_rule),
        )
        .route(
            "/superadmin/rules/{id}",
            delete(handlers::superadmin::delete_rule),
        )
        .route("/superadmin/teams", post(handlers::superadmin::create_team))
        .route(
            "/superadmin/teams/{id}",
            delete(handlers::superadmin::delete_team),
        )
        .route(
            "/superadmin/teams/{id}/reset",
            post(handlers::superadmin::reset_team),
        )
        .route(
            "/superadmin/users",
            get(handlers::superadmin::list_users).post(handlers::superadmin::create_user),
        )
        .route(
            "/superadmin/questions",
            get(handlers::superadmin::list_questions).post(handlers::superadmin::create_question),
        )
        .route(
            "/superadmin/questions/{id}",
            patch(handlers::superadmin::update_question),
        )
        .route(
            "/superadmin/questions/import",
            post(handlers::superadmin::import_questions),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
