//! API Routes
//!
//! Configures the Axum router for the store endpoint.

use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::auth::basic_auth;
use super::handlers::{delete_handler, get_handler, health_handler, set_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST|PUT /` - Create a collection or store objects
/// - `GET /` - Describe a collection or read objects
/// - `DELETE /` - Delete a collection or objects
/// - `GET /health` - Health check endpoint (no authentication)
///
/// # Middleware
/// - Basic auth on `/` when credentials are configured
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
/// - Timeout: Bounds each request by the configured read timeout
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let request_timeout = Duration::from_millis(state.server.read_timeout_ms);

    let store_routes = Router::new()
        .route(
            "/",
            get(get_handler)
                .post(set_handler)
                .put(set_handler)
                .delete(delete_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), basic_auth));

    Router::new()
        .merge(store_routes)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
