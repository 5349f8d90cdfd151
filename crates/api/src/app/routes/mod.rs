use axum::{routing::get, Router};

pub mod catalog;
pub mod summary;
pub mod system;

/// Router for all dashboard endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/dataset", get(system::dataset))
        .nest("/categories", catalog::router())
        .nest("/summary", summary::router())
}
