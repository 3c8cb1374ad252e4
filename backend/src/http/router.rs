//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, compression, tracing).

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // The mobile client is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Session
        .route(
            "/auth/session",
            post(handlers::sign_in).delete(handlers::sign_out),
        )
        // Catalog
        .route("/packages", get(handlers::list_packages))
        .route("/packages/{package_id}", get(handlers::get_package))
        // Availability and booking handoff
        .route(
            "/packages/{package_id}/availability",
            get(handlers::get_availability),
        )
        .route("/packages/{package_id}/calendar", get(handlers::get_calendar))
        .route(
            "/packages/{package_id}/booking-intents",
            post(handlers::create_booking_intent),
        )
        // Favorites
        .route("/favorites", get(handlers::list_favorites))
        .route(
            "/favorites/{package_id}",
            put(handlers::add_favorite).delete(handlers::remove_favorite),
        )
        // Bookings
        .route(
            "/bookings",
            get(handlers::list_bookings).post(handlers::create_booking),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
