use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::gateway::Record;
use crate::shared::constants::TABLE_LYRICS;

/// Song lyric used as a music-generation prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lyric {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Musical style hint, e.g. "bossa nova, voz feminina"
    #[serde(default)]
    pub style: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Lyric {
    const TABLE: &'static str = TABLE_LYRICS;
}
