pub mod catalog;
pub mod preference;
pub mod track;

pub use catalog::{
    CatalogTrack, RecommendationResult, SearchResult, SpotifyRecommendationResponse,
    SpotifySearchResponse, SpotifyTokenResponse,
};
pub use preference::{NewPreferenceRecord, Preference, PreferenceRecord};
pub use track::{
    TrackActivityRequest, UnifiedRecommendationResult, UnifiedSearchResult, UnifiedTrack,
};
