use std::time::Duration;

use crate::ports::spotify::{SpotifyAuthApi, SpotifyTrackApi};
use crate::spotify_rs::SpotifyApiError;
use crate::spotify_rs::auth::request_client_credentials_token;
use crate::spotify_rs::types::{SpotifyTokenResponse, SpotifyTrackPayload};

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

#[derive(Clone)]
pub struct SpotifyApiCredentials {
    client_id: String,
    client_secret: String,
}

impl SpotifyApiCredentials {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for SpotifyApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyApiCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Spotify Web API client backed by reqwest
pub struct SpotifyHttpClient {
    client: reqwest::Client,
    credentials: SpotifyApiCredentials,
    accounts_url: String,
    api_url: String,
    timeout: Duration,
}

impl SpotifyHttpClient {
    pub fn new(
        credentials: SpotifyApiCredentials,
        accounts_url: &str,
        api_url: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }

    fn track_url(&self, track_id: &str) -> String {
        format!("{}/tracks/{}", self.api_url, track_id)
    }
}

#[async_trait::async_trait]
impl SpotifyAuthApi for SpotifyHttpClient {
    #[tracing::instrument(skip(self))]
    async fn client_credentials_token(&self) -> Result<SpotifyTokenResponse, SpotifyApiError> {
        request_client_credentials_token(
            &self.client,
            &self.token_url(),
            self.credentials.client_id(),
            self.credentials.client_secret(),
            self.timeout,
        )
        .await
    }
}

#[async_trait::async_trait]
impl SpotifyTrackApi for SpotifyHttpClient {
    #[tracing::instrument(skip(self, access_token))]
    async fn track(
        &self,
        track_id: &str,
        access_token: &str,
    ) -> Result<SpotifyTrackPayload, SpotifyApiError> {
        let response = self
            .client
            .get(self.track_url(track_id))
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpotifyApiError::UnexpectedStatus {
                status: status.as_u16(),
                reason: response
                    .text()
                    .await
                    .unwrap_or("Failed to get error text".to_string()),
            });
        }

        let track: SpotifyTrackPayload = response.json().await?;
        Ok(track)
    }
}
