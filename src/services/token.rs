use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::error::{SongError, SongResult};
use crate::ports::spotify::SpotifyAuthApi;
use crate::spotify_rs::types::SpotifyTokenResponse;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;
/// Upper bound on the lifetime accepted from the token endpoint
const MAX_EXPIRES_IN_SECS: u64 = 24 * 3600;

/// A provider access token and the instant it stops being usable.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    access_token: String,
    expiry: DateTime<Utc>,
}

impl BearerToken {
    #[cfg(test)]
    pub fn new(access_token: String, expiry: DateTime<Utc>) -> Self {
        Self {
            access_token,
            expiry,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }

    /// Build a token from the exchange response, obtained at `now`
    pub fn from_response(response: SpotifyTokenResponse, now: DateTime<Utc>) -> SongResult<Self> {
        let access_token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                SongError::TokenAcquisitionFailed("response has no access_token".to_string())
            })?;
        let expires_in = response
            .expires_in
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS)
            .min(MAX_EXPIRES_IN_SECS);

        let expiry = i64::try_from(expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                SongError::TokenAcquisitionFailed(format!("expires_in out of range: {expires_in}"))
            })?;

        Ok(Self {
            access_token,
            expiry,
        })
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Process-wide cache for the provider token.
///
/// The lock is held across a refresh, so concurrent callers that find the token
/// expired wait for the one refresh in flight instead of issuing their own.
#[derive(Default)]
pub struct TokenStore {
    cached: Mutex<Option<BearerToken>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_token(token: BearerToken) -> Self {
        Self {
            cached: Mutex::new(Some(token)),
        }
    }

    #[cfg(test)]
    pub async fn current(&self) -> Option<BearerToken> {
        self.cached.lock().await.clone()
    }

    /// Return the cached token if it is still valid, otherwise run `refresh` and cache its result.
    /// A failed refresh leaves the previous value in place.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> SongResult<BearerToken>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SongResult<BearerToken>>,
    {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && token.is_valid_at(Utc::now())
        {
            return Ok(token.clone());
        }

        let token = refresh().await?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

/// Hands out a valid provider token, exchanging client credentials when needed.
pub struct TokenManager {
    store: Arc<TokenStore>,
    auth: Arc<dyn SpotifyAuthApi>,
}

impl TokenManager {
    pub fn new(store: Arc<TokenStore>, auth: Arc<dyn SpotifyAuthApi>) -> Self {
        Self { store, auth }
    }

    pub async fn get_valid_token(&self) -> SongResult<BearerToken> {
        self.store
            .get_or_refresh(|| async {
                tracing::debug!("Provider token missing or expired, requesting a new one");
                let response = self.auth.client_credentials_token().await.map_err(|e| {
                    tracing::warn!(error = %e, "Client credentials exchange failed");
                    SongError::TokenAcquisitionFailed(e.to_string())
                })?;

                let token = BearerToken::from_response(response, Utc::now())?;
                tracing::info!(expiry = %token.expiry(), "Provider token refreshed");
                Ok(token)
            })
            .await
    }
}
