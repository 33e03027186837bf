use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::{
        CatalogTrack, NewPreferenceRecord, Preference, PreferenceRecord,
        UnifiedRecommendationResult, UnifiedSearchResult, UnifiedTrack,
    },
    services::providers::CatalogProvider,
};

/// Largest search page the catalog accepts
pub const MAX_PAGE_SIZE: u32 = 50;

/// Largest recommendation batch the catalog accepts
pub const MAX_RECOMMENDATION_LIMIT: u32 = 100;

/// Reconciles catalog results with the requesting user's stored preferences
///
/// Every call is a single linear pipeline: catalog call, one bulk preference
/// lookup, merge. A failure at any step fails the whole call; catalog results
/// are never returned without the preference lookup having succeeded.
pub struct TrackService {
    catalog: Arc<dyn CatalogProvider>,
    preferences: Arc<dyn PreferenceStore>,
}

impl TrackService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            catalog,
            preferences,
        }
    }

    /// Searches the catalog and annotates each hit with the user's preference
    ///
    /// `page_index` is 1-based.
    pub async fn search(
        &self,
        query: &str,
        page_size: u32,
        page_index: u32,
        user_id: i64,
    ) -> AppResult<UnifiedSearchResult> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        validate_batch_size("page_size", page_size, MAX_PAGE_SIZE)?;
        if page_index == 0 {
            return Err(AppError::InvalidInput(
                "page_index starts at 1".to_string(),
            ));
        }

        let limit = page_size;
        let offset = (page_index - 1)
            .checked_mul(page_size)
            .ok_or_else(|| AppError::InvalidInput("page_index is out of range".to_string()))?;

        let result = self.catalog.search(query, limit, offset).await.map_err(|e| {
            tracing::error!(error = %e, provider = self.catalog.name(), "Track search failed");
            e
        })?;

        let preferences = self.lookup_preferences(user_id, &result.tracks).await?;

        Ok(UnifiedSearchResult {
            limit: result.limit,
            offset: result.offset,
            total: result.total,
            items: merge_preferences(&result.tracks, &preferences),
        })
    }

    /// Fetches recommendations seeded by `track_id`, annotated with the user's preferences
    pub async fn get_recommendations(
        &self,
        user_id: i64,
        limit: u32,
        track_id: &str,
    ) -> AppResult<UnifiedRecommendationResult> {
        if track_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Seed track ID cannot be empty".to_string(),
            ));
        }
        validate_batch_size("limit", limit, MAX_RECOMMENDATION_LIMIT)?;

        let result = self
            .catalog
            .get_recommendations(limit, track_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = self.catalog.name(),
                    "Recommendation fetch failed"
                );
                e
            })?;

        let preferences = self.lookup_preferences(user_id, &result.tracks).await?;

        Ok(UnifiedRecommendationResult {
            items: merge_preferences(&result.tracks, &preferences),
        })
    }

    /// Records `preference` for (user, track), creating the record on first use
    pub async fn upsert_track_activity(
        &self,
        user_id: i64,
        track_id: &str,
        preference: Preference,
    ) -> AppResult<()> {
        if track_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Track ID cannot be empty".to_string(),
            ));
        }

        match self.preferences.get(user_id, track_id).await {
            Ok(mut record) => {
                record.preference = preference;
                self.preferences.update(&record).await.map_err(|e| {
                    tracing::error!(
                        error = %e,
                        user_id = user_id,
                        track_id = %track_id,
                        "Failed to update track activity"
                    );
                    e
                })?;
                tracing::info!(
                    user_id = user_id,
                    track_id = %track_id,
                    ?preference,
                    "Track activity updated"
                );
            }
            Err(AppError::NotFound(_)) => {
                let record = NewPreferenceRecord::for_user(user_id, track_id, preference);
                self.preferences.create(&record).await.map_err(|e| {
                    tracing::error!(
                        error = %e,
                        user_id = user_id,
                        track_id = %track_id,
                        "Failed to create track activity"
                    );
                    e
                })?;
                tracing::info!(
                    user_id = user_id,
                    track_id = %track_id,
                    ?preference,
                    "Track activity created"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    user_id = user_id,
                    track_id = %track_id,
                    "Failed to load track activity"
                );
                return Err(e);
            }
        }

        Ok(())
    }

    /// Bulk lookup for the IDs of `tracks`; no storage round-trip when there are none
    async fn lookup_preferences(
        &self,
        user_id: i64,
        tracks: &[CatalogTrack],
    ) -> AppResult<HashMap<String, PreferenceRecord>> {
        if tracks.is_empty() {
            return Ok(HashMap::new());
        }

        let track_ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();

        self.preferences
            .get_bulk(user_id, &track_ids)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = user_id, "Failed to load track activities");
                e
            })
    }
}

fn validate_batch_size(name: &str, value: u32, max: u32) -> AppResult<()> {
    if value == 0 || value > max {
        return Err(AppError::InvalidInput(format!(
            "{} must be between 1 and {}",
            name, max
        )));
    }
    Ok(())
}

/// Attaches stored preferences to catalog tracks, preserving catalog order
///
/// Tracks without a record come out as `Preference::Neutral`.
pub fn merge_preferences(
    tracks: &[CatalogTrack],
    preferences: &HashMap<String, PreferenceRecord>,
) -> Vec<UnifiedTrack> {
    tracks
        .iter()
        .map(|track| UnifiedTrack {
            track: track.clone(),
            preference: preferences
                .get(&track.id)
                .map(|record| record.preference)
                .unwrap_or_default(),
        })
        .collect()
}
