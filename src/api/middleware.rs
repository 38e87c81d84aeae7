//! Cross-cutting request middleware.
//!
//! The chain is applied by [`apply`] in a fixed order, outermost first:
//!
//! 1. recovery: a panic anywhere below becomes a 500 JSON response
//! 2. access log: one structured line per completed request
//! 3. CORS: response headers, OPTIONS answered without reaching a handler
//! 4. `Server` header on every response that reaches the router
//!
//! A second recovery layer sits directly above the router. Handler panics are
//! caught there, so the 500 still passes back through the header, CORS and log
//! layers. The outer one only catches panics raised by the middleware itself.

use std::any::Any;
use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use super::error::{ApiError, INTERNAL_ERROR};
use crate::config::{ConfigError, CorsConfig};

/// Value of the `Server` response header
pub const SERVER_NAME: &str = "DamoangAuth";

pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

pub const ALLOWED_HEADERS: [HeaderName; 3] =
    [header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION];

/// Wrap `router` with the middleware chain
pub fn apply(router: Router, cors: &CorsConfig) -> Result<Router, ConfigError> {
    Ok(router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn(access_log))
            .layer(cors_layer(cors)?)
            .layer(SetResponseHeaderLayer::if_not_present(
                header::SERVER,
                HeaderValue::from_static(SERVER_NAME),
            ))
            .layer(CatchPanicLayer::custom(handle_panic)),
    ))
}

/// Convert a panic payload into a 500 response
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        INTERNAL_ERROR.to_string()
    };

    ApiError::internal(message).into_response()
}

/// Log status, latency, client address, method and path once the response is ready
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(request).await;

    tracing::info!(
        target: "access",
        status = response.status().as_u16(),
        latency = ?start.elapsed(),
        ip = %ip,
        method = %method,
        path = %path,
        "{} {}",
        method,
        path
    );

    response
}

/// Build the CORS layer. Methods and headers are fixed; origins come from config.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(config.origin_values()?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers(ALLOWED_HEADERS.to_vec()))
}
