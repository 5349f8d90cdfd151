//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: dataset loading and the shared dashboard
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: query parameters and response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_context_middleware))
                .layer(Extension(services)),
        )
}
