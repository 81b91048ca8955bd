use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::gateway::Record;
use crate::shared::constants::TABLE_LINKS;

/// Bookmarked external resource (model page, tool, reference gallery)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Link {
    const TABLE: &'static str = TABLE_LINKS;
}
