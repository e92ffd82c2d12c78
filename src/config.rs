use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use color_eyre::{Result, eyre::eyre};

use crate::spotify_rs::client::{DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL, SpotifyApiCredentials};

pub const DEFAULT_ENV_FILE: &str = "/run/secrets/env";

/// Load `KEY=VALUE` pairs from the secrets file into the environment.
/// Variables that are already set are left alone. Returns `Ok(None)` when there is no file.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenv::Error> {
    let path = std::env::var("SONGREC_ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
    let path = PathBuf::from(path);

    if !path.exists() {
        return Ok(None);
    }
    dotenv::from_path(&path)?;
    Ok(Some(path))
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseConfig {
    /// Full database connection URL, takes precedence over the DB_* parts
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    pub db_pass: Option<String>,

    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Deployment environment, required with the DB_* parts; anything but `prod` disables TLS
    #[arg(long = "env", env = "ENV")]
    pub environment: Option<String>,
}

impl DatabaseConfig {
    pub fn database_url(&self) -> Result<String> {
        if let Some(url) = &self.database_url
            && !url.is_empty()
        {
            return Ok(url.clone());
        }

        let part = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| eyre!("missing DB variable: {}", name))
        };
        let host = part(&self.db_host, "DB_HOST")?;
        let user = part(&self.db_user, "DB_USER")?;
        let pass = part(&self.db_pass, "DB_PASS")?;
        let name = part(&self.db_name, "DB_NAME")?;
        let environment = part(&self.environment, "ENV")?;

        let mut url = format!("postgres://{}:{}@{}/{}", user, pass, host, name);
        if environment != "prod" {
            url.push_str("?sslmode=disable");
        }
        Ok(url)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SpotifyConfig {
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    pub spotify_client_id: String,

    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: String,

    #[arg(long, env = "SPOTIFY_ACCOUNTS_URL", default_value = DEFAULT_ACCOUNTS_URL)]
    pub spotify_accounts_url: String,

    #[arg(long, env = "SPOTIFY_API_URL", default_value = DEFAULT_API_URL)]
    pub spotify_api_url: String,

    /// Timeout for each request to Spotify, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,
}

impl SpotifyConfig {
    pub fn credentials(&self) -> SpotifyApiCredentials {
        SpotifyApiCredentials::new(
            self.spotify_client_id.clone(),
            self.spotify_client_secret.clone(),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
