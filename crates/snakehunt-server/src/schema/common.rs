//! Common API response wrapper types.
//!
//! [`ApiResponse`] provides the standard envelope for all successful API
//! responses.

use serde::Serialize;

/// Standard API response envelope.
///
/// All successful responses wrap their payload in this structure. The
/// `success` field is always `true`; failures are produced by
/// [`ApiError`](crate::error::ApiError) instead.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true` for successful responses.
    pub success: bool,
    /// Response payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data,
        }
    }
}

/// Payload of a health probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub version: &'static str,
}
