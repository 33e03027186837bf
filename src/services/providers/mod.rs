/// Music catalog provider abstraction
///
/// The reconciliation service talks to the catalog only through this trait, so the
/// preference merge can be exercised without a network. The Spotify Web API is the
/// only implementation.
use crate::{
    error::AppResult,
    models::{RecommendationResult, SearchResult},
};

pub mod spotify;
pub mod token;

pub use spotify::SpotifyProvider;
pub use token::{AccessCredential, ClientCredentialsSource, TokenCache, TokenSource};

/// Trait for catalog providers
///
/// Implementations make a single attempt per call. Failures are returned to the caller,
/// which owns any retry decision.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search tracks by free text
    ///
    /// Returns the requested page along with the provider's paging metadata.
    async fn search(&self, query: &str, limit: u32, offset: u32) -> AppResult<SearchResult>;

    /// Fetch tracks similar to a single seed track
    async fn get_recommendations(
        &self,
        limit: u32,
        seed_track_id: &str,
    ) -> AppResult<RecommendationResult>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
