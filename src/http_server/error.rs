use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::SongError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// An error rendered as `{"status": ..., "error": ...}` with a fixed status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    status_text: &'static str,
    error: Option<String>,
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            status_text: "Invalid request.",
            error: Some(message.into()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            status_text: "Resource not found.",
            error: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            status_text: "Unauthorized.",
            error: None,
        }
    }

    pub fn server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            status_text: "Server error.",
            error: None,
        }
    }

    pub fn not_implemented() -> Self {
        Self {
            status: StatusCode::NOT_IMPLEMENTED,
            status_text: "Not implemented.",
            error: None,
        }
    }
}

impl From<SongError> for ApiError {
    fn from(err: SongError) -> Self {
        match err {
            SongError::MalformedLink(_)
            | SongError::UnsupportedProvider(_)
            | SongError::TrackIdNotFound(_) => ApiError::invalid_request(err.to_string()),
            SongError::NotFound => ApiError::not_found(),
            SongError::Unauthorized => ApiError::unauthorized(),
            SongError::TokenAcquisitionFailed(_)
            | SongError::MetadataFetchFailed(_)
            | SongError::StorageError(_) => {
                tracing::error!(error = %err, "Request failed on a dependency");
                ApiError::server_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status_text,
            error: self.error,
        };
        (self.status, Json(body)).into_response()
    }
}
