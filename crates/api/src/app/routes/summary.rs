use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use basketdash_core::Dimension;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/categories", get(category_summary))
        .route("/sub-categories", get(sub_category_summary))
        .route("/brands", get(brand_summary))
}

pub async fn category_summary(Extension(services): Extension<Arc<AppServices>>) -> Json<dto::SummaryResponse> {
    Json(dto::SummaryResponse::categories(
        services.dashboard().category_summary(),
    ))
}

/// Sub-category breakdown of one category; defaults to the first category.
pub async fn sub_category_summary(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::SubCategorySummaryQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let category = match query.validate() {
        Ok(c) => c,
        Err(e) => return errors::query_error_to_response(e),
    };

    let dashboard = services.dashboard();
    let Some(category) = category.or_else(|| dashboard.default_selection().map(|s| s.category)) else {
        // Empty table: there is no category to default to.
        return Json(dto::SummaryResponse {
            title: "No data loaded".to_string(),
            category: None,
            sub_category: None,
            top_n: None,
            summary: dashboard.empty_summary(Dimension::SubCategory),
        })
        .into_response();
    };

    let summary = dashboard.sub_category_summary(&category);
    Json(dto::SummaryResponse::sub_categories(category, summary)).into_response()
}

/// Top brands by discount; missing selections fall back to the dropdown
/// defaults (first category, then its first sub-category).
pub async fn brand_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    query: Result<Query<dto::BrandSummaryQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let query = match query.validate() {
        Ok(q) => q,
        Err(e) => return errors::query_error_to_response(e),
    };

    let dashboard = services.dashboard();
    let top_n = query.top_n.unwrap_or_else(|| dashboard.brand_top_n());

    let (category, sub_category) = match (query.category, query.sub_category) {
        (Some(category), Some(sub_category)) => (Some(category), Some(sub_category)),
        (Some(category), None) => {
            let sub_category = dashboard.available_sub_categories(&category).into_iter().next();
            (Some(category), sub_category)
        }
        (None, _) => match dashboard.default_selection() {
            Some(selection) => (Some(selection.category), Some(selection.sub_category)),
            None => (None, None),
        },
    };

    tracing::debug!(
        request_id = %ctx.request_id(),
        category = ?category,
        sub_category = ?sub_category,
        top_n,
        "brand summary selection"
    );

    let summary = match (category.as_deref(), sub_category.as_deref()) {
        (Some(c), Some(s)) => dashboard.brand_summary(c, s, Some(top_n)),
        _ => dashboard.empty_summary(Dimension::Brand),
    };

    Json(dto::SummaryResponse::brands(category, sub_category, top_n, summary)).into_response()
}
