pub mod providers;
pub mod tracks;

pub use tracks::TrackService;
