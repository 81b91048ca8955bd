use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::gateway::Record;
use crate::shared::constants::TABLE_CATEGORIES;

/// Stored category row. `parent_id = None` marks a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Category {
    const TABLE: &'static str = TABLE_CATEGORIES;
}
