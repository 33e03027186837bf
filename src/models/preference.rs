use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's stance on a track
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    Liked,
    Disliked,
    /// No stance recorded, or an explicit reset
    #[default]
    Neutral,
}

impl Preference {
    /// Column representation: `true` / `false` / `NULL`
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Preference::Liked => Some(true),
            Preference::Disliked => Some(false),
            Preference::Neutral => None,
        }
    }
}

impl From<Option<bool>> for Preference {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Preference::Liked,
            Some(false) => Preference::Disliked,
            None => Preference::Neutral,
        }
    }
}

/// A stored preference for one (user, track) pair
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceRecord {
    pub id: i64,
    pub user_id: i64,
    pub track_id: String,
    pub preference: Preference,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A preference that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPreferenceRecord {
    pub user_id: i64,
    pub track_id: String,
    pub preference: Preference,
    pub created_by: String,
    pub updated_by: String,
}

impl NewPreferenceRecord {
    /// First action of `user_id` on `track_id`; the user is both creator and updater
    pub fn for_user(user_id: i64, track_id: impl Into<String>, preference: Preference) -> Self {
        let actor = user_id.to_string();
        Self {
            user_id,
            track_id: track_id.into(),
            preference,
            created_by: actor.clone(),
            updated_by: actor,
        }
    }
}
