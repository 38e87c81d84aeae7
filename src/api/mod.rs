pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod system;

use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

use crate::config::ConfigError;
use crate::AppState;

/// Route table. Built once at startup and never mutated afterwards.
pub fn create_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/", exact(get(auth::index)))
        .route("/login", exact(post(auth::login)))
        .route("/register", exact(post(auth::register)))
        .route("/profile", exact(get(auth::profile)));

    let api_routes = Router::new().nest("/auth", auth_routes);

    Router::new()
        .route("/health", exact(get(system::health_check)))
        .nest("/api/v1", api_routes)
        .fallback(system::not_found)
        .with_state(state)
}

/// A wrong method on a known path is treated like an unknown path
fn exact(route: MethodRouter<Arc<AppState>>) -> MethodRouter<Arc<AppState>> {
    route.fallback(system::not_found)
}

/// The complete service: trailing-slash normalisation, routing and the middleware chain
pub fn create_app(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let cors = state.config.cors.clone();
    let routes = NormalizePathLayer::trim_trailing_slash().layer(create_router(state));

    middleware::apply(Router::new().fallback_service(routes), &cors)
}
