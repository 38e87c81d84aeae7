//! Service-level endpoints: health check and the not-found fallback.

use axum::{
    extract::OriginalUri,
    http::Method,
    Json,
};
use serde::Serialize;

use super::error::{ApiError, NOT_FOUND};

pub const SERVICE_NAME: &str = "auth";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub message: &'static str,
}

/// Report service health
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        message: "Damoang auth service is up and running",
    })
}

/// Fallback for any unmatched path or method
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(NOT_FOUND)
        .with_detail("path", uri.path())
        .with_detail("method", method.as_str())
        .with_detail("message", "check the API endpoint")
}
