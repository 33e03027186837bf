/// Spotify Web API catalog provider
///
/// API Flow:
/// 1. Credential: TokenCache (client-credentials grant, refreshed lazily)
/// 2. Search: /v1/search?type=track → paging object of track items
/// 3. Recommendations: /v1/recommendations?seed_tracks= → flat list of tracks
use reqwest::{header::AUTHORIZATION, Client as HttpClient};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{
        RecommendationResult, SearchResult, SpotifyRecommendationResponse, SpotifySearchResponse,
    },
    services::providers::{CatalogProvider, TokenCache},
};

const SEARCH_TYPE: &str = "track";

pub struct SpotifyProvider {
    http_client: HttpClient,
    api_url: String,
    market: String,
    token_cache: TokenCache,
}

impl SpotifyProvider {
    pub fn new(
        http_client: HttpClient,
        token_cache: TokenCache,
        api_url: String,
        market: String,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            market,
            token_cache,
        }
    }

    /// Issues an authenticated GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let (token, token_type) = self.token_cache.credential().await?;

        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("{} {}", token_type, token))
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, path = %path, "Spotify request failed");
                AppError::CatalogRequest(format!("Request to {} failed: {}", path, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, path = %path, "Spotify API returned error status");
            return Err(AppError::CatalogRequest(format!(
                "Spotify API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await.map_err(|e| {
            AppError::CatalogRequest(format!("Failed to read Spotify response: {}", e))
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize Spotify response"
            );
            AppError::CatalogRequest(format!("Failed to parse Spotify response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for SpotifyProvider {
    async fn search(&self, query: &str, limit: u32, offset: u32) -> AppResult<SearchResult> {
        let response: SpotifySearchResponse = self
            .get_json(
                "/v1/search",
                &[
                    ("q", query.to_string()),
                    ("type", SEARCH_TYPE.to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        let result = SearchResult::from(response);

        tracing::info!(
            query = %query,
            results = result.tracks.len(),
            total = result.total,
            provider = self.name(),
            "Track search completed"
        );

        Ok(result)
    }

    async fn get_recommendations(
        &self,
        limit: u32,
        seed_track_id: &str,
    ) -> AppResult<RecommendationResult> {
        let response: SpotifyRecommendationResponse = self
            .get_json(
                "/v1/recommendations",
                &[
                    ("limit", limit.to_string()),
                    ("market", self.market.clone()),
                    ("seed_tracks", seed_track_id.to_string()),
                ],
            )
            .await?;

        let result = RecommendationResult::from(response);

        tracing::info!(
            seed_track_id = %seed_track_id,
            results = result.tracks.len(),
            provider = self.name(),
            "Recommendations fetched"
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{token::MockTokenSource, AccessCredential};
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
        Router,
    };
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const SEARCH_BODY: &str = r#"{
        "tracks": {
            "href": "https://api.spotify.com/v1/search?query=bohemian+rhapsody&type=track&offset=0&limit=10",
            "limit": 10,
            "next": null,
            "offset": 0,
            "previous": null,
            "total": 905,
            "items": [
                {
                    "album": {
                        "album_type": "album",
                        "total_tracks": 12,
                        "images": [{"url": "https://i.scdn.co/image/ab67616d0000b273e319baafd16e84f0408af2a0"}],
                        "name": "A Night At The Opera (2011 Remaster)"
                    },
                    "artists": [{"href": "https://api.spotify.com/v1/artists/1dfeR4HaWDbWqFHLkxsg1d", "name": "Queen"}],
                    "explicit": false,
                    "href": "https://api.spotify.com/v1/tracks/4u7EnebtmKWzUH433cf5Qv",
                    "id": "4u7EnebtmKWzUH433cf5Qv",
                    "name": "Bohemian Rhapsody - Remastered 2011"
                }
            ]
        }
    }"#;

    const RECOMMENDATION_BODY: &str = r#"{
        "tracks": [
            {
                "album": {"album_type": "album", "total_tracks": 22, "images": [], "name": "Bohemian Rhapsody (The Original Soundtrack)"},
                "artists": [{"name": "Queen"}],
                "explicit": false,
                "id": "3z8h0TU7ReDPLIbEnYhWZb",
                "name": "Bohemian Rhapsody"
            }
        ]
    }"#;

    #[derive(Default, Clone)]
    struct Captured {
        params: Arc<Mutex<HashMap<String, String>>>,
        authorization: Arc<Mutex<Option<String>>>,
    }

    /// Serves `body` with `status` on `path`, recording the query and auth header
    async fn spawn_stub(path: &str, status: StatusCode, body: &'static str) -> (String, Captured) {
        let captured = Captured::default();
        let recorder = captured.clone();

        let app = Router::new().route(
            path,
            get(
                move |Query(params): Query<HashMap<String, String>>, headers: HeaderMap| {
                    let recorder = recorder.clone();
                    async move {
                        *recorder.params.lock().unwrap() = params;
                        *recorder.authorization.lock().unwrap() = headers
                            .get("authorization")
                            .and_then(|h| h.to_str().ok())
                            .map(str::to_string);
                        (status, body).into_response()
                    }
                },
            ),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        (format!("http://{}", addr), captured)
    }

    fn create_test_provider(api_url: String) -> SpotifyProvider {
        let mut source = MockTokenSource::new();
        source.expect_request_token().times(0);

        let token_cache = TokenCache::with_credential(
            source,
            AccessCredential {
                token: "accessToken".to_string(),
                token_type: "Bearer".to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        );

        SpotifyProvider::new(HttpClient::new(), token_cache, api_url, "ID".to_string())
    }

    #[tokio::test]
    async fn test_search_success() {
        let (url, captured) = spawn_stub("/v1/search", StatusCode::OK, SEARCH_BODY).await;
        let provider = create_test_provider(url);

        let result = provider.search("bohemian rhapsody", 10, 0).await.unwrap();

        assert_eq!(result.limit, 10);
        assert_eq!(result.offset, 0);
        assert_eq!(result.total, 905);
        assert_eq!(result.tracks.len(), 1);
        assert_eq!(result.tracks[0].id, "4u7EnebtmKWzUH433cf5Qv");
        assert_eq!(result.tracks[0].album_name, "A Night At The Opera (2011 Remaster)");

        let params = captured.params.lock().unwrap().clone();
        assert_eq!(params["q"], "bohemian rhapsody");
        assert_eq!(params["type"], "track");
        assert_eq!(params["limit"], "10");
        assert_eq!(params["offset"], "0");
        assert_eq!(
            captured.authorization.lock().unwrap().as_deref(),
            Some("Bearer accessToken")
        );
    }

    #[tokio::test]
    async fn test_search_non_success_status() {
        let (url, _) = spawn_stub(
            "/v1/search",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .await;
        let provider = create_test_provider(url);

        let result = provider.search("bohemian rhapsody", 10, 0).await;
        assert!(matches!(result, Err(AppError::CatalogRequest(_))));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let (url, _) = spawn_stub("/v1/search", StatusCode::OK, r#"{"tracks": 42}"#).await;
        let provider = create_test_provider(url);

        let result = provider.search("bohemian rhapsody", 10, 0).await;
        assert!(matches!(result, Err(AppError::CatalogRequest(_))));
    }

    #[tokio::test]
    async fn test_recommendations_success() {
        let (url, captured) =
            spawn_stub("/v1/recommendations", StatusCode::OK, RECOMMENDATION_BODY).await;
        let provider = create_test_provider(url);

        let result = provider.get_recommendations(10, "trackID").await.unwrap();

        assert_eq!(result.tracks.len(), 1);
        assert_eq!(result.tracks[0].id, "3z8h0TU7ReDPLIbEnYhWZb");
        assert_eq!(result.tracks[0].album_total_tracks, 22);

        let params = captured.params.lock().unwrap().clone();
        assert_eq!(params["limit"], "10");
        assert_eq!(params["market"], "ID");
        assert_eq!(params["seed_tracks"], "trackID");
    }

    #[tokio::test]
    async fn test_recommendations_non_success_status() {
        let (url, _) = spawn_stub(
            "/v1/recommendations",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .await;
        let provider = create_test_provider(url);

        let result = provider.get_recommendations(10, "trackID").await;
        assert!(matches!(result, Err(AppError::CatalogRequest(_))));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = create_test_provider(format!("http://{}", addr));
        let result = provider.search("bohemian rhapsody", 10, 0).await;
        assert!(matches!(result, Err(AppError::CatalogRequest(_))));
    }

    #[tokio::test]
    async fn test_token_failure_is_provider_auth() {
        let mut source = MockTokenSource::new();
        source
            .expect_request_token()
            .times(1)
            .returning(|| Err(AppError::ProviderAuth("invalid_client".to_string())));

        let provider = SpotifyProvider::new(
            HttpClient::new(),
            TokenCache::new(source),
            "http://127.0.0.1:9".to_string(),
            "ID".to_string(),
        );

        let result = provider.get_recommendations(10, "trackID").await;
        assert!(matches!(result, Err(AppError::ProviderAuth(_))));
    }
}
