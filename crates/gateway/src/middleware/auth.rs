//! Admin authentication middleware
//!
//! Rejects requests without a valid admin API key before they reach a
//! handler. Handlers that need the acting admin's identity additionally
//! take the `AdminContext` extractor.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use lexforge_common::auth::authorize_headers;
use lexforge_common::errors::AppError;

use crate::AppState;

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize_headers(request.headers(), &state.config.auth)?;
    Ok(next.run(request).await)
}
