pub mod postgres;
pub mod preferences;

pub use postgres::{create_pool, run_migrations};
pub use preferences::{PgPreferenceStore, PreferenceStore};
