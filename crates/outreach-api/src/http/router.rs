//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Compose session lifecycle
        .route("/compose/sessions", post(handlers::compose::create_session))
        .route(
            "/compose/sessions/{id}",
            get(handlers::compose::get_session).delete(handlers::compose::delete_session),
        )
        // Wizard steps
        .route(
            "/compose/sessions/{id}/template",
            post(handlers::compose::select_template),
        )
        .route(
            "/compose/sessions/{id}/audience",
            post(handlers::compose::select_audience),
        )
        .route(
            "/compose/sessions/{id}/draft",
            put(handlers::compose::edit_draft),
        )
        .route(
            "/compose/sessions/{id}/generate",
            post(handlers::compose::generate_draft),
        )
        .route(
            "/compose/sessions/{id}/back",
            post(handlers::compose::step_back),
        )
        .route(
            "/compose/sessions/{id}/preview",
            post(handlers::compose::advance_to_preview).get(handlers::compose::get_preview),
        )
        .route(
            "/compose/sessions/{id}/send",
            post(handlers::compose::send),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
