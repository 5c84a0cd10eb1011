//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Origins allowed when none are configured
const DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Build the CORS layer from a `*` or comma-separated origin list
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allow_origin = match origins {
        Some("*") => AllowOrigin::from(Any),
        Some(origins) => AllowOrigin::list(
            origins
                .split(',')
                .filter_map(|s| s.trim().parse::<HeaderValue>().ok()),
        ),
        None => AllowOrigin::list(
            DEV_ORIGINS
                .iter()
                .map(|origin| HeaderValue::from_static(origin)),
        ),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origins.as_deref());

    Router::new()
        .route("/books", get(handlers::list_books))
        .route("/books", post(handlers::upload_book))
        .route("/books/:id", get(handlers::get_book))
        .route("/books/:id", axum::routing::delete(handlers::delete_book))
        .route("/books/:id/content", get(handlers::get_book_content))
        .route("/genres", get(handlers::list_genres))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
