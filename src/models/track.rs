use serde::{Deserialize, Serialize};

use super::{CatalogTrack, Preference};

/// A catalog track annotated with the requesting user's preference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnifiedTrack {
    #[serde(flatten)]
    pub track: CatalogTrack,
    pub preference: Preference,
}

/// Search page returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnifiedSearchResult {
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
    pub items: Vec<UnifiedTrack>,
}

/// Recommendations returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnifiedRecommendationResult {
    pub items: Vec<UnifiedTrack>,
}

/// Body of POST /track-activity
#[derive(Debug, Clone, Deserialize)]
pub struct TrackActivityRequest {
    pub track_id: String,
    #[serde(default)]
    pub preference: Preference,
}
