use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::{TrackActivityRequest, UnifiedRecommendationResult, UnifiedSearchResult},
    routes::AppState,
};

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_PAGE_INDEX: u32 = 1;
const DEFAULT_RECOMMENDATION_LIMIT: u32 = 10;

/// Query strings are parsed leniently: a missing or non-numeric paging value
/// falls back to its default instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
    page_size: Option<String>,
    page_index: Option<String>,
}

impl SearchQuery {
    fn page_size(&self) -> u32 {
        parse_or(self.page_size.as_deref(), DEFAULT_PAGE_SIZE)
    }

    fn page_index(&self) -> u32 {
        parse_or(self.page_index.as_deref(), DEFAULT_PAGE_INDEX)
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    track_id: String,
    limit: Option<String>,
}

impl RecommendationQuery {
    fn limit(&self) -> u32 {
        parse_or(self.limit.as_deref(), DEFAULT_RECOMMENDATION_LIMIT)
    }
}

fn parse_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Handler for track search endpoint
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<UnifiedSearchResult>> {
    tracing::info!(
        request_id = %request_id,
        user_id = user_id,
        query = %params.query,
        page_size = params.page_size(),
        page_index = params.page_index(),
        "Processing track search"
    );

    let response = state
        .tracks
        .search(&params.query, params.page_size(), params.page_index(), user_id)
        .await?;

    Ok(Json(response))
}

/// Handler for recommendations endpoint
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentUser(user_id): CurrentUser,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<UnifiedRecommendationResult>> {
    tracing::info!(
        request_id = %request_id,
        user_id = user_id,
        track_id = %params.track_id,
        limit = params.limit(),
        "Processing recommendations"
    );

    let response = state
        .tracks
        .get_recommendations(user_id, params.limit(), &params.track_id)
        .await?;

    Ok(Json(response))
}

/// Handler for like/dislike/reset on a track
pub async fn upsert_track_activity(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<TrackActivityRequest>,
) -> AppResult<StatusCode> {
    tracing::info!(
        request_id = %request_id,
        user_id = user_id,
        track_id = %request.track_id,
        preference = ?request.preference,
        "Processing track activity"
    );

    state
        .tracks
        .upsert_track_activity(user_id, &request.track_id, request.preference)
        .await?;

    Ok(StatusCode::OK)
}
