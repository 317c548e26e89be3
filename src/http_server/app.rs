use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    http_server::{
        error::{handle_panic, method_not_allowed, route_not_found},
        http_routes::{health, playlists, search, video},
        state::{AppState, CatalogHandle},
    },
    services::catalog::CatalogService,
};

pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub credentials_file: PathBuf,
    pub request_timeout: Duration,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/search", get(search::search_tracks))
        .route("/playlists", get(playlists::list_playlists))
        .route("/playlist/create", post(playlists::create_playlist))
        .route("/playlist/{id}/tracks", get(playlists::playlist_tracks))
        .route("/playlist/{id}/add", post(playlists::add_tracks))
        .route("/video/{id}", get(video::video_info))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(app_state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    tracing::info!("Initializing YouTube Music API...");
    let catalog = CatalogHandle::from_startup(CatalogService::connect(
        &config.credentials_file,
        config.request_timeout,
    ));
    if let CatalogHandle::Uninitialized { reason } = &catalog {
        return Err(eyre!(
            "Failed to initialize YouTube Music API ({reason}). Please check {}",
            config.credentials_file.display()
        ));
    }
    tracing::info!("YouTube Music API initialized successfully");

    let app_state = Arc::new(AppState {
        catalog,
        service_name: env!("CARGO_PKG_NAME").to_string(),
    });
    let app = router(app_state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}", address))?;
    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use color_eyre::eyre::eyre;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::ports::catalog::MockCatalogClient;
    use crate::ytmusic_rs::types::{LibraryPlaylist, PlaylistContents, Thumbnail, TrackItem};

    fn ready_app(client: MockCatalogClient) -> Router {
        router(Arc::new(AppState {
            catalog: CatalogHandle::Ready(CatalogService::new(Arc::new(client))),
            service_name: "test".to_string(),
        }))
    }

    fn uninitialized_app() -> Router {
        router(Arc::new(AppState {
            catalog: CatalogHandle::from_startup(CatalogService::connect(
                &PathBuf::from("/nonexistent/oauth.json"),
                Duration::from_secs(1),
            )),
            service_name: "test".to_string(),
        }))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (status, body) = call(ready_app(MockCatalogClient::new()), get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["ytmusic_initialized"], true);
    }

    #[tokio::test]
    async fn test_uninitialized_refuses_catalog_endpoints() {
        let (status, body) = call(uninitialized_app(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ytmusic_initialized"], false);

        let requests = vec![
            get_request("/search?q=test"),
            get_request("/playlists"),
            get_request("/playlist/PL1/tracks"),
            post_json("/playlist/create", json!({ "title": "Mix" })),
            post_json("/playlist/PL1/add", json!({ "track_ids": ["a"] })),
            get_request("/video/abc123"),
        ];
        for request in requests {
            let (status, body) = call(uninitialized_app(), request).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], "YouTube Music API not initialized");
        }
    }

    #[tokio::test]
    async fn test_search_empty_query_is_bad_request() {
        for uri in ["/search?q=", "/search?q=%20%20", "/search"] {
            let (status, body) = call(ready_app(MockCatalogClient::new()), get_request(uri)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "No search query provided" }));
        }
    }

    #[tokio::test]
    async fn test_search_returns_records() {
        let mut client = MockCatalogClient::new();
        client
            .expect_search()
            .withf(|query, _, _| query == "get lucky")
            .returning(|_, _, _| {
                Ok(vec![TrackItem {
                    result_type: Some("song".into()),
                    video_id: Some("vid1".into()),
                    title: Some("Get Lucky".into()),
                    thumbnails: vec![
                        Thumbnail {
                            url: "small".into(),
                            ..Default::default()
                        },
                        Thumbnail {
                            url: "large".into(),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }])
            });

        let (status, body) = call(ready_app(client), get_request("/search?q=%20get%20lucky%20")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "vid1");
        assert_eq!(body[0]["videoId"], "vid1");
        assert_eq!(body[0]["artist"], "Unknown Artist");
        assert_eq!(body[0]["album"], "Unknown Album");
        assert_eq!(body[0]["duration"], "0:00");
        assert_eq!(body[0]["thumbnail"], "large");
    }

    #[tokio::test]
    async fn test_search_repeated_query_uses_first_value() {
        let mut client = MockCatalogClient::new();
        client
            .expect_search()
            .withf(|query, _, _| query == "a")
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let (status, body) = call(ready_app(client), get_request("/search?q=a&q=b")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = call(uninitialized_app(), get_request("/search?q=a&q=b")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "YouTube Music API not initialized" }));
    }

    #[tokio::test]
    async fn test_search_upstream_error_is_internal() {
        let mut client = MockCatalogClient::new();
        client
            .expect_search()
            .returning(|_, _, _| Err(eyre!("Server returned HTTP 401: Unauthorized")));

        let (status, body) = call(ready_app(client), get_request("/search?q=x")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server returned HTTP 401: Unauthorized");
    }

    #[tokio::test]
    async fn test_list_playlists() {
        let mut client = MockCatalogClient::new();
        client.expect_library_playlists().returning(|limit| {
            assert_eq!(limit, 100);
            Ok(vec![LibraryPlaylist {
                playlist_id: Some("PL1".into()),
                title: Some("Favourites".into()),
                count: Some(7),
                ..Default::default()
            }])
        });

        let (status, body) = call(ready_app(client), get_request("/playlists")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["playlistId"], "PL1");
        assert_eq!(body[0]["name"], "Favourites");
        assert_eq!(body[0]["trackCount"], 7);
        assert_eq!(body[0]["thumbnail"], Value::Null);
    }

    #[tokio::test]
    async fn test_playlist_tracks_without_tracks_is_empty_list() {
        let mut client = MockCatalogClient::new();
        client.expect_playlist().returning(|id, _| {
            Ok(PlaylistContents {
                id: id.to_string(),
                ..Default::default()
            })
        });

        let (status, body) = call(ready_app(client), get_request("/playlist/doesnotexist/tracks")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_playlist_requires_title() {
        let (status, body) = call(
            ready_app(MockCatalogClient::new()),
            post_json("/playlist/create", json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Playlist title required" }));
    }

    #[tokio::test]
    async fn test_create_playlist_defaults_description() {
        let mut client = MockCatalogClient::new();
        client
            .expect_create_playlist()
            .withf(|title, description| title == "Mix" && description.is_empty())
            .returning(|_, _| Ok(Some("PLnew".into())));

        let (status, body) = call(
            ready_app(client),
            post_json("/playlist/create", json!({ "title": "Mix" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "id": "PLnew", "title": "Mix", "description": "", "success": true })
        );
    }

    #[tokio::test]
    async fn test_add_tracks_requires_ids() {
        let (status, body) = call(
            ready_app(MockCatalogClient::new()),
            post_json("/playlist/PL1/add", json!({ "other": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Track IDs required" }));
    }

    #[tokio::test]
    async fn test_add_tracks_single_id() {
        let mut client = MockCatalogClient::new();
        client.expect_playlist().returning(|_, _| {
            Ok(PlaylistContents {
                track_count: Some(4),
                ..Default::default()
            })
        });
        client
            .expect_add_playlist_items()
            .withf(|id, ids| id == "PL1" && ids == ["abc".to_string()])
            .returning(|_, _| Ok(json!({ "status": "STATUS_SUCCEEDED" })));

        let (status, body) = call(
            ready_app(client),
            post_json("/playlist/PL1/add", json!({ "track_ids": "abc" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["tracks_before"], 4);
        assert_eq!(body["tracks_added"], 0);
    }

    #[tokio::test]
    async fn test_video_not_found() {
        let mut client = MockCatalogClient::new();
        client
            .expect_song()
            .returning(|_| Err(eyre!("player failed")));
        client.expect_search().returning(|_, _, _| Ok(Vec::new()));

        let (status, body) = call(ready_app(client), get_request("/video/abc123")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Video not found" }));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = call(ready_app(MockCatalogClient::new()), get_request("/nope")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Endpoint not found" }));
    }

    #[tokio::test]
    async fn test_wrong_method_is_json_error() {
        let requests = vec![
            get_request("/playlist/create"),
            post_json("/health", json!({})),
        ];
        for request in requests {
            let (status, body) = call(ready_app(MockCatalogClient::new()), request).await;

            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body, json!({ "error": "Method not allowed" }));
        }
    }
}
