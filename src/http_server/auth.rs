use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::SongError;
use crate::http_server::{error::ApiError, state::AppState};

/// Accepts `Authorization: <token>` as well as `Authorization: Bearer <token>`
fn token_matches(header_value: &str, expected: &str) -> bool {
    let presented = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim();
    !expected.is_empty() && presented == expected
}

pub async fn require_api_token(
    State(app_state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| token_matches(value, &app_state.api_token));

    if !authorized {
        tracing::warn!(uri = %request.uri(), "Rejected request with invalid API token");
        return ApiError::from(SongError::Unauthorized).into_response();
    }

    next.run(request).await
}
