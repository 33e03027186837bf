use std::sync::Arc;

use crate::services::TrackService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub tracks: Arc<TrackService>,
}

impl AppState {
    pub fn new(tracks: TrackService) -> Self {
        Self {
            tracks: Arc::new(tracks),
        }
    }
}
