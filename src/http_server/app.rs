use std::{any::Any, sync::Arc};

use axum::{
    Router,
    handler::Handler,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;

use crate::http_server::{auth, error::ApiError, http_routes::song, state::AppState};

fn handle_panic(_: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::server_error().into_response()
}

async fn root() -> &'static str {
    "Pong!"
}

pub fn router(app_state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route(
            "/song",
            get(song::get_song).post(song::create_song.layer(middleware::from_fn_with_state(
                app_state.clone(),
                auth::require_api_token,
            ))),
        )
        .route("/song/history", get(song::get_song_history))
        .route("/song/submit", post(song::submit_song))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::custom(handle_panic)),
        );

    #[cfg(debug_assertions)]
    let router = router.layer(CorsLayer::permissive());

    router.with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub struct HttpServerConfig {
    pub port: u16,
    pub app_state: Arc<AppState>,
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let HttpServerConfig { port, app_state } = config;

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    tracing::info!(port, "Server is up and running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::database::Database;
    use crate::ports::spotify::{MockSpotifyAuthApi, MockSpotifyTrackApi};
    use crate::services::{
        metadata::MetadataFetcher,
        song::SongService,
        token::{TokenManager, TokenStore},
    };
    use crate::spotify_rs::SpotifyApiError;
    use crate::spotify_rs::types::{SpotifyArtistRef, SpotifyTokenResponse, SpotifyTrackPayload};
    use crate::test_utils::test_db;

    const API_TOKEN: &str = "admin-secret";

    fn app(db: Arc<Database>, auth: MockSpotifyAuthApi, tracks: MockSpotifyTrackApi) -> Router {
        let tokens = TokenManager::new(Arc::new(TokenStore::new()), Arc::new(auth));
        let metadata = MetadataFetcher::new(Arc::new(tracks));
        router(Arc::new(AppState {
            songs: SongService::new(db, Arc::new(tokens), Arc::new(metadata)),
            api_token: API_TOKEN.to_string(),
        }))
    }

    fn working_spotify() -> (MockSpotifyAuthApi, MockSpotifyTrackApi) {
        let mut auth = MockSpotifyAuthApi::new();
        auth.expect_client_credentials_token().returning(|| {
            Ok(SpotifyTokenResponse {
                access_token: Some("tok".into()),
                token_type: Some("Bearer".into()),
                expires_in: Some(3600),
            })
        });
        let mut tracks = MockSpotifyTrackApi::new();
        tracks.expect_track().returning(|_, _| {
            Ok(SpotifyTrackPayload {
                name: Some("Song A".into()),
                artists: vec![SpotifyArtistRef {
                    name: Some("Artist A".into()),
                }],
                album: None,
            })
        });
        (auth, tracks)
    }

    fn post_song(link: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/song").header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        builder
            .body(Body::from(json!({ "songLink": link }).to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_pong() {
        let db = test_db().await;
        let response = app(db, MockSpotifyAuthApi::new(), MockSpotifyTrackApi::new())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_get_song_not_found() {
        let db = test_db().await;
        let response = app(db, MockSpotifyAuthApi::new(), MockSpotifyTrackApi::new())
            .oneshot(Request::get("/song").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "status": "Resource not found." })
        );
    }

    #[tokio::test]
    async fn test_post_then_get_song() {
        let db = test_db().await;
        let (auth, tracks) = working_spotify();
        let app = app(db, auth, tracks);

        let link = "https://open.spotify.com/track/abc123?si=xyz";
        let response = app
            .clone()
            .oneshot(post_song(link, Some(API_TOKEN)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/song").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["title"], "Song A");
        assert_eq!(body["artist"], "Artist A");
        assert_eq!(body["image_url"], "");
        assert_eq!(body["song_url"], link);
        assert_eq!(body["platform"], "Spotify");
        assert!(body["id"].is_i64());
    }

    #[tokio::test]
    async fn test_post_song_bearer_prefix_accepted() {
        let db = test_db().await;
        let (auth, tracks) = working_spotify();

        let response = app(db, auth, tracks)
            .oneshot(post_song(
                "https://open.spotify.com/track/abc123",
                Some(format!("Bearer {API_TOKEN}").as_str()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_song_requires_token() {
        let db = test_db().await;
        let mut auth = MockSpotifyAuthApi::new();
        auth.expect_client_credentials_token().never();
        let app = app(db, auth, MockSpotifyTrackApi::new());

        for token in [None, Some("wrong")] {
            let response = app
                .clone()
                .oneshot(post_song("https://open.spotify.com/track/abc123", token))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(body_json(response).await, json!({ "status": "Unauthorized." }));
        }
    }

    #[tokio::test]
    async fn test_post_song_unsupported_provider() {
        let db = test_db().await;
        let response = app(db, MockSpotifyAuthApi::new(), MockSpotifyTrackApi::new())
            .oneshot(post_song(
                "https://soundcloud.com/artist/song",
                Some(API_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "Invalid request.");
        assert!(body["error"].as_str().unwrap().contains("unsupported provider"));
    }

    #[tokio::test]
    async fn test_post_song_bad_body() {
        let db = test_db().await;
        let request = Request::post("/song")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, API_TOKEN)
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(db, MockSpotifyAuthApi::new(), MockSpotifyTrackApi::new())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "Invalid request.");
    }

    #[tokio::test]
    async fn test_post_song_provider_failure() {
        let db = test_db().await;
        let (auth, _) = working_spotify();
        let mut tracks = MockSpotifyTrackApi::new();
        tracks
            .expect_track()
            .returning(|_, _| Err(SpotifyApiError::TimedOut));

        let response = app(db, auth, tracks)
            .oneshot(post_song(
                "https://open.spotify.com/track/abc123",
                Some(API_TOKEN),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "status": "Server error." }));
    }

    #[tokio::test]
    async fn test_history_and_reserved_submit() {
        let db = test_db().await;
        let (auth, tracks) = working_spotify();
        let app = app(db, auth, tracks);

        for id in ["a", "b"] {
            let response = app
                .clone()
                .oneshot(post_song(
                    &format!("https://open.spotify.com/track/{id}"),
                    Some(API_TOKEN),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(
                Request::get("/song/history?page_size=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_count"], 2);
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["items"][0]["song_url"],
            "https://open.spotify.com/track/b"
        );

        let response = app
            .oneshot(Request::post("/song/submit").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_history_bad_query() {
        let db = test_db().await;
        let response = app(db, MockSpotifyAuthApi::new(), MockSpotifyTrackApi::new())
            .oneshot(
                Request::get("/song/history?page_size=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "Invalid request.");
        assert!(body["error"].is_string());
    }
}
