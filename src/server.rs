use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::MovieStore;
use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
}

impl AppState {
    pub fn new(config: Config, store: MovieStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let movie_routes = Router::new()
        .route("/movies", get(handlers::list_movies))
        .route("/movies/genre/:genre", get(handlers::movies_by_genre))
        .route("/movies/details/:id", get(handlers::movie_details))
        .route(
            "/movies/release-year/:year",
            get(handlers::movies_by_release_year),
        );

    Router::new()
        .route("/", get(handlers::root))
        .merge(movie_routes)
        .fallback(handlers::fallback)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn seeded_router(rows: &[MovieRow]) -> (tempfile::TempDir, Router) {
        let (dir, path) = seed_database(rows, true).await;
        let store = MovieStore::new();
        store.connect(&path).await.unwrap();
        (dir, build_router(AppState::new(Config::default(), store)))
    }

    async fn fetch(router: &Router, uri: &str) -> (StatusCode, String, Vec<u8>) {
        send(router, Method::GET, uri).await
    }

    async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, String, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router
            .clone()
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body.to_vec())
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_root_message() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, content_type, body) = fetch(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(json_body(&body), json!({ "message": "Movie query service" }));
    }

    #[tokio::test]
    async fn test_list_all_movies() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, _, body) = fetch(&router, "/movies").await;
        assert_eq!(status, StatusCode::OK);

        let body = json_body(&body);
        let movies = body["movies"].as_array().unwrap();
        assert_eq!(movies.len(), MOVIES.len());
        assert_eq!(movies[0]["title"], "Dangal");
        assert_eq!(movies[0]["rating"], 4.8);
    }

    #[tokio::test]
    async fn test_every_genre_returns_only_its_rows() {
        let (_dir, router) = seeded_router(MOVIES).await;
        for genre in ["Biography", "Action", "Comedy", "Drama", "Historical"] {
            let (status, _, body) = fetch(&router, &format!("/movies/genre/{}", genre)).await;
            assert_eq!(status, StatusCode::OK);

            let body = json_body(&body);
            let returned: Vec<i64> = body["movies"]
                .as_array()
                .unwrap()
                .iter()
                .map(|m| m["id"].as_i64().unwrap())
                .collect();
            let expected: Vec<i64> = MOVIES
                .iter()
                .filter(|row| row.3 == genre)
                .map(|row| row.0)
                .collect();
            assert_eq!(returned, expected, "genre {}", genre);
        }
    }

    #[tokio::test]
    async fn test_genre_dangal() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, _, body) = fetch(&router, "/movies/genre/Biography").await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert!(body["movies"]
            .as_array()
            .unwrap()
            .iter()
            .any(|m| m["title"] == "Dangal"));
    }

    #[tokio::test]
    async fn test_genre_is_case_sensitive() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, _, body) = fetch(&router, "/movies/genre/biography").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(&body),
            json!({ "status": 404, "error": "No movies found with given genre" })
        );
    }

    #[tokio::test]
    async fn test_details_by_id() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, _, body) = fetch(&router, "/movies/details/2").await;
        assert_eq!(status, StatusCode::OK);

        let body = json_body(&body);
        let movie = body["movie"].as_array().unwrap();
        assert_eq!(movie.len(), 1);
        assert_eq!(movie[0]["title"], "Baahubali 2: The Conclusion");
        assert_eq!(movie[0]["box_office_collection"], 181);
        assert!(body.get("movies").is_none());
    }

    #[tokio::test]
    async fn test_details_missing_id() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, content_type, body) = fetch(&router, "/movies/details/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type, "application/json");
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"status":404,"error":"No movies found with given ID"}"#
        );

        let (status, _, _) = fetch(&router, "/movies/details/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_release_year() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, _, body) = fetch(&router, "/movies/release-year/2015").await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["movies"][0]["title"], "Bajrangi Bhaijaan");

        let (status, _, body) = fetch(&router, "/movies/release-year/1990").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(&body),
            json!({ "status": 404, "error": "No movies found with given release year" })
        );
    }

    #[tokio::test]
    async fn test_empty_table() {
        let (_dir, router) = seeded_router(&[]).await;
        let (status, _, body) = fetch(&router, "/movies").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(&body),
            json!({ "status": 404, "error": "No movies found" })
        );
    }

    #[tokio::test]
    async fn test_not_connected_is_server_error() {
        let router = build_router(AppState::new(Config::default(), MovieStore::new()));
        for uri in [
            "/movies",
            "/movies/genre/Biography",
            "/movies/details/1",
            "/movies/release-year/2016",
        ] {
            let (status, _, body) = fetch(&router, uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                json_body(&body),
                json!({ "status": 500, "error": "Database not connected" })
            );
        }
    }

    #[tokio::test]
    async fn test_missing_table_is_server_error() {
        let (_dir, path) = seed_database(&[], false).await;
        let store = MovieStore::new();
        store.connect(&path).await.unwrap();
        let router = build_router(AppState::new(Config::default(), store));

        let (status, _, body) = fetch(&router, "/movies").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(&body);
        assert_eq!(body["status"], 500);
        assert!(body["error"].as_str().unwrap().contains("no such table"));
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (_, _, first) = fetch(&router, "/movies").await;
        let (_, _, second) = fetch(&router, "/movies").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (_dir, router) = seeded_router(MOVIES).await;
        let (status, _, body) = fetch(&router, "/shows").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(&body), json!({ "status": 404, "error": "Not found" }));
    }

    #[tokio::test]
    async fn test_undecodable_path_is_json_bad_request() {
        let (_dir, router) = seeded_router(MOVIES).await;
        for uri in [
            "/movies/genre/%FF",
            "/movies/details/%FF",
            "/movies/release-year/%FF",
        ] {
            let (status, content_type, body) = fetch(&router, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(content_type, "application/json");
            let body = json_body(&body);
            assert_eq!(body["status"], 400);
            assert!(!body["error"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_wrong_method_is_json() {
        let (_dir, router) = seeded_router(MOVIES).await;
        for uri in ["/movies", "/movies/details/1", "/"] {
            let (status, content_type, body) = send(&router, Method::POST, uri).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
            assert_eq!(content_type, "application/json");
            assert_eq!(
                json_body(&body),
                json!({ "status": 405, "error": "Method not allowed" })
            );
        }
    }
}
