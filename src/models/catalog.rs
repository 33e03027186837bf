use serde::{Deserialize, Serialize};

// ============================================================================
// Spotify Web API Types
// ============================================================================

/// Response from the accounts token endpoint
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpotifyTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Raw response from GET /v1/search?type=track
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySearchResponse {
    pub tracks: SpotifyTracks,
}

/// Paging object wrapping search items
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTracks {
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
    #[serde(default)]
    pub items: Vec<SpotifyTrackObject>,
}

/// Raw response from GET /v1/recommendations
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyRecommendationResponse {
    #[serde(default)]
    pub tracks: Vec<SpotifyTrackObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrackObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub explicit: bool,
    pub album: SpotifyAlbumObject,
    #[serde(default)]
    pub artists: Vec<SpotifyArtistObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbumObject {
    pub name: String,
    pub album_type: String,
    pub total_tracks: u32,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtistObject {
    pub name: String,
}

// ============================================================================
// Internal catalog shapes
// ============================================================================

/// A track as returned by the catalog, flattened for clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub explicit: bool,
    pub album_name: String,
    pub album_type: String,
    pub album_total_tracks: u32,
    pub album_image_urls: Vec<String>,
    pub artist_names: Vec<String>,
}

impl From<SpotifyTrackObject> for CatalogTrack {
    fn from(track: SpotifyTrackObject) -> Self {
        CatalogTrack {
            id: track.id,
            name: track.name,
            explicit: track.explicit,
            album_name: track.album.name,
            album_type: track.album.album_type,
            album_total_tracks: track.album.total_tracks,
            album_image_urls: track.album.images.into_iter().map(|i| i.url).collect(),
            artist_names: track.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

/// One page of catalog search results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
    pub tracks: Vec<CatalogTrack>,
}

impl From<SpotifySearchResponse> for SearchResult {
    fn from(response: SpotifySearchResponse) -> Self {
        let page = response.tracks;
        SearchResult {
            limit: page.limit,
            offset: page.offset,
            total: page.total,
            tracks: page.items.into_iter().map(CatalogTrack::from).collect(),
        }
    }
}

/// Tracks recommended for a seed track
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    pub tracks: Vec<CatalogTrack>,
}

impl From<SpotifyRecommendationResponse> for RecommendationResult {
    fn from(response: SpotifyRecommendationResponse) -> Self {
        RecommendationResult {
            tracks: response.tracks.into_iter().map(CatalogTrack::from).collect(),
        }
    }
}
