use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::get,
    Json, Router,
};

use crate::app::dto;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories))
        .route("/:category/sub-categories", get(list_sub_categories))
}

pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> Json<dto::OptionsResponse> {
    Json(dto::OptionsResponse::new(services.dashboard().categories()))
}

/// Unknown categories yield an empty option list, not an error.
pub async fn list_sub_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Path(category): Path<String>,
) -> Json<dto::OptionsResponse> {
    Json(dto::OptionsResponse::new(
        services.dashboard().available_sub_categories(&category),
    ))
}
