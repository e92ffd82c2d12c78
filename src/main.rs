mod config;
mod database;
mod entities;
mod error;
mod http_server;
mod logging;
mod ports;
mod services;
mod spotify_rs;
#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::{DatabaseConfig, SpotifyConfig},
    database::Database,
    http_server::{app::HttpServerConfig, state::AppState},
    logging::init_tracing,
    services::{
        metadata::MetadataFetcher,
        song::SongService,
        token::{TokenManager, TokenStore},
    },
    spotify_rs::client::SpotifyHttpClient,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tracing filter directive, e.g. `info` or `songrec=debug`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// OTLP collector endpoint; spans are only exported when set
    #[arg(long, global = true, env = "OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default)
    Serve(ServeArgs),
    /// Apply pending database migrations and exit
    Migrate,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    #[arg(short, long, default_value_t = 443, env = "PORT")]
    port: u16,

    /// Shared secret for POST /song
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    api_token: String,

    #[command(flatten)]
    spotify: SpotifyConfig,
}

async fn serve(database: Database, args: ServeArgs) -> Result<()> {
    let spotify = Arc::new(SpotifyHttpClient::new(
        args.spotify.credentials(),
        &args.spotify.spotify_accounts_url,
        &args.spotify.spotify_api_url,
        args.spotify.timeout(),
    ));

    let tokens = TokenManager::new(Arc::new(TokenStore::new()), spotify.clone());
    let metadata = MetadataFetcher::new(spotify);
    let songs = SongService::new(Arc::new(database), Arc::new(tokens), Arc::new(metadata));

    http_server::app::start(HttpServerConfig {
        port: args.port,
        app_state: Arc::new(AppState {
            songs,
            api_token: args.api_token,
        }),
    })
    .await
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Must run before parsing so clap sees the file's variables
    let env_file = config::load_env_file();

    let args = Args::parse();
    let _tracing = init_tracing(&args.log_level, args.otlp_endpoint.as_deref())?;

    match env_file {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Ok(None) => tracing::debug!("No environment file found"),
        Err(e) => tracing::warn!(error = %e, "Failed to read environment file"),
    }

    let command = match args.command {
        Some(command) => command,
        None => Commands::Serve(
            ServeArgs::try_parse_from(["songrec"]).wrap_err("Missing server configuration")?,
        ),
    };

    let database_url = args.database.database_url()?;
    tracing::debug!("Opening database");
    let database = Database::open(&database_url)
        .await
        .wrap_err("Failed to open database")?;

    match command {
        Commands::Migrate => tracing::info!("Database migrations applied"),
        Commands::Serve(serve_args) => serve(database, serve_args).await?,
    }

    Ok(())
}
