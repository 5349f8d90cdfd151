use std::time::Instant;

use axum::{
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Attach a [`RequestContext`], log the request, and echo the id back.
pub async fn request_context_middleware(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = RequestContext::generate();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ctx);

    let started = Instant::now();
    let mut res = next.run(req).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    tracing::info!(
        request_id = %ctx.request_id(),
        %method,
        %path,
        status = res.status().as_u16(),
        elapsed_ms,
        "request handled"
    );

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
