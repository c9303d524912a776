pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::config::Config;
use crate::resume::handlers;

pub fn build_router(config: &Config) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-resume",
            post(handlers::handle_generate_resume),
        )
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
}
