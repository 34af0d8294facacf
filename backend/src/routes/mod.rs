//! Route definitions for the BlackBoard API
//!
//! This module assembles the router: health probes outside the API-key
//! gate, every `/api/*` route behind it, and the shared middleware
//! stack on top.

use crate::auth::{require_api_key, API_KEY_HEADER};
use crate::resources::{
    resource_routes, Blog, Course, Employee, Event, School, Student, Teacher,
};
use crate::state::AppState;
use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod health;
mod users;

#[cfg(test)]
mod user_tests;

pub use users::user_routes;

/// Request bodies above this size are rejected outright.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let api = api_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        require_api_key,
    ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api", api)
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    HeaderName::from_static(API_KEY_HEADER),
                ]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes behind the API-key gate
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/user", users::user_routes())
        .nest("/blog", resource_routes::<Blog>())
        .nest("/course", resource_routes::<Course>())
        .nest("/employee", resource_routes::<Employee>())
        .nest("/event", resource_routes::<Event>())
        .nest("/school", resource_routes::<School>())
        .nest("/student", resource_routes::<Student>())
        .nest("/teacher", resource_routes::<Teacher>())
}
