use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};

use crate::app::dto;
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn dataset(Extension(services): Extension<Arc<AppServices>>) -> Json<dto::DatasetResponse> {
    let dashboard = services.dashboard();
    Json(dto::DatasetResponse {
        rows: dashboard.table().len(),
        categories: dashboard.categories().len(),
        load: services.dataset().cloned(),
        default_selection: dashboard.default_selection(),
    })
}
