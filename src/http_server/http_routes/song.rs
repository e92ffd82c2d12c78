use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::entities::song;
use crate::http_server::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SongRequest {
    #[serde(rename = "songLink")]
    pub song_link: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub page_size: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub items: Vec<song::Model>,
    pub total_count: u64,
    pub page_size: u64,
    pub offset: u64,
}

/// GET /song
/// Returns the most recently recommended song
pub async fn get_song(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<song::Model>, ApiError> {
    let song = app_state.songs.get_latest().await?;
    Ok(Json(song))
}

/// GET /song/history
/// Returns recommended songs, newest first
pub async fn get_song_history(
    State(app_state): State<Arc<AppState>>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Failed to decode history query");
        ApiError::invalid_request(rejection.body_text())
    })?;

    let page = app_state
        .songs
        .history(params.page_size, params.offset)
        .await?;

    Ok(Json(HistoryResponse {
        items: page.items,
        total_count: page.total_count,
        page_size: page.page_size,
        offset: page.offset,
    }))
}

/// POST /song
/// Publishes a new recommendation from a Spotify track link. Admin only.
///
/// Body: {"songLink": "https://open.spotify.com/track/..."}
pub async fn create_song(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Failed to decode song request");
        ApiError::invalid_request(rejection.body_text())
    })?;

    app_state.songs.submit(&request.song_link).await?;
    Ok(StatusCode::OK)
}

/// POST /song/submit
/// Public submissions behind a captcha are not available yet
pub async fn submit_song() -> ApiError {
    ApiError::not_implemented()
}
