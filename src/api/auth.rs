use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::{
    ApiError, ALL_FIELDS_REQUIRED, INVALID_CREDENTIALS, INVALID_TOKEN, TOKEN_REQUIRED,
};
use super::extract::Payload;
use crate::models::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse, UserView,
    ADMIN_ROLE, ADMIN_USER_ID, REGISTERED_USER_ID,
};
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Endpoints served under /api/v1/auth
pub const ENDPOINTS: [&str; 5] = [
    "GET /api/v1/auth - API information",
    "POST /api/v1/auth/login - sign in",
    "POST /api/v1/auth/register - sign up",
    "GET /api/v1/auth/profile - current user profile",
    "GET /health - health check",
];

/// Response for the auth API index
#[derive(Debug, Serialize)]
pub struct AuthIndexResponse {
    pub message: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// List the auth endpoints
/// GET /api/v1/auth
pub async fn index() -> Json<AuthIndexResponse> {
    Json(AuthIndexResponse {
        message: "Damoang auth API",
        endpoints: ENDPOINTS.to_vec(),
    })
}

/// Login endpoint
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if !state.verifier.verify(&request.email, &request.password) {
        tracing::info!(email = %request.email, "Login rejected");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS).failed());
    }

    let token = state.verifier.issue_token(&request.email);
    tracing::info!(email = %request.email, "Login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user: UserView::new(ADMIN_USER_ID, request.email, &state.config.auth.admin_name),
        token,
    }))
}

/// Registration endpoint. Nothing is stored, so duplicate emails are accepted.
/// POST /api/v1/auth/register
pub async fn register(
    Payload(request): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if !request.is_complete() {
        return Err(ApiError::validation(ALL_FIELDS_REQUIRED));
    }

    tracing::info!(email = %request.email, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Registration complete".to_string(),
            user: UserView::new(REGISTERED_USER_ID, request.email, request.name),
        }),
    ))
}

/// Profile of the token holder
/// GET /api/v1/auth/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let token = extract_bearer(&headers)?;

    if !state.verifier.verify_token(token) {
        return Err(ApiError::unauthorized(INVALID_TOKEN));
    }

    let auth = &state.config.auth;
    Ok(Json(ProfileResponse {
        success: true,
        user: UserView::new(ADMIN_USER_ID, &auth.admin_email, &auth.admin_name)
            .with_role(ADMIN_ROLE),
    }))
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// A missing or empty header means no token was sent; anything else that
/// isn't a bearer credential is an invalid token.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = match headers.get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ApiError::unauthorized(TOKEN_REQUIRED)),
    };

    header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| ApiError::unauthorized(INVALID_TOKEN))
}
