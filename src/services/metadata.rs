use std::sync::Arc;

use crate::entities::song::Platform;
use crate::error::{SongError, SongResult};
use crate::ports::spotify::SpotifyTrackApi;
use crate::services::token::BearerToken;
use crate::spotify_rs::types::SpotifyTrackPayload;

/// Track details kept for a recommendation.
///
/// Every field is optional upstream. A missing value becomes an empty string
/// rather than failing the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub image_url: String,
}

impl From<SpotifyTrackPayload> for TrackMetadata {
    fn from(payload: SpotifyTrackPayload) -> Self {
        let artist = payload
            .artists
            .into_iter()
            .next()
            .and_then(|artist| artist.name)
            .unwrap_or_default();
        let image_url = payload
            .album
            .and_then(|album| album.images.into_iter().next())
            .and_then(|image| image.url)
            .unwrap_or_default();

        Self {
            title: payload.name.unwrap_or_default(),
            artist,
            image_url,
        }
    }
}

pub struct MetadataFetcher {
    spotify: Arc<dyn SpotifyTrackApi>,
}

impl MetadataFetcher {
    pub fn new(spotify: Arc<dyn SpotifyTrackApi>) -> Self {
        Self { spotify }
    }

    pub async fn fetch_track(
        &self,
        platform: Platform,
        track_id: &str,
        token: &BearerToken,
    ) -> SongResult<TrackMetadata> {
        match platform {
            Platform::Spotify => {
                let payload = self
                    .spotify
                    .track(track_id, token.access_token())
                    .await
                    .map_err(|e| {
                        tracing::warn!(track_id, error = %e, "Spotify track request failed");
                        SongError::MetadataFetchFailed(e.to_string())
                    })?;

                let metadata = TrackMetadata::from(payload);
                if metadata.title.is_empty() || metadata.artist.is_empty() {
                    tracing::warn!(track_id, "Spotify track response is missing title or artist");
                }
                Ok(metadata)
            }
            other => Err(SongError::UnsupportedProvider(other.to_string())),
        }
    }
}
