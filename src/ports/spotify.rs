use crate::spotify_rs::SpotifyApiError;
use crate::spotify_rs::types::{SpotifyTokenResponse, SpotifyTrackPayload};

/// Port for the client credentials token exchange.
///
/// Implemented by `spotify_rs::client::SpotifyHttpClient` in production and by mocks in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SpotifyAuthApi: Send + Sync {
    async fn client_credentials_token(&self) -> Result<SpotifyTokenResponse, SpotifyApiError>;
}

/// Port for reading track details.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SpotifyTrackApi: Send + Sync {
    async fn track(
        &self,
        track_id: &str,
        access_token: &str,
    ) -> Result<SpotifyTrackPayload, SpotifyApiError>;
}
