//! Liveness probe.

use axum::Json;

use crate::schema::common::{ApiResponse, HealthView};

/// `GET /health`
pub async fn health() -> Json<ApiResponse<HealthView>> {
    Json(ApiResponse::ok(HealthView {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
