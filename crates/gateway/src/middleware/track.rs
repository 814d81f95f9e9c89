//! Request metrics middleware

use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};
use lexforge_common::metrics::RequestMetrics;

pub async fn track_requests(request: Request, next: Next) -> Response {
    // Label by route template, not the raw path, to keep cardinality down
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let tracker = RequestMetrics::start(request.method().as_str(), &endpoint);

    let response = next.run(request).await;
    tracker.finish(response.status().as_u16());
    response
}
