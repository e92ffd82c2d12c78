use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::spotify_rs::SpotifyApiError;
use crate::spotify_rs::types::SpotifyTokenResponse;

/// Value of the `Authorization` header for the token endpoint
fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Request an app-only access token with the client credentials grant
/// https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow
pub async fn request_client_credentials_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    timeout: Duration,
) -> Result<SpotifyTokenResponse, SpotifyApiError> {
    let response = client
        .post(token_url)
        // Serializes to x-www-form-urlencoded and sets the content type
        .form(&[("grant_type", "client_credentials")])
        .header(
            reqwest::header::AUTHORIZATION,
            basic_auth_header(client_id, client_secret),
        )
        .timeout(timeout)
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

    let token_response: SpotifyTokenResponse = response.json().await?;
    Ok(token_response)
}
