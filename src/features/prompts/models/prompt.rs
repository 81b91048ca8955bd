use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::ratings::models::StarRating;
use crate::modules::gateway::Record;
use crate::shared::constants::{RATING_FAVORITE, TABLE_PROMPTS};
use crate::shared::types::Tristate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub text: String,
    pub category_id: String,
    /// Legacy favorite flag, 0 or 1
    #[serde(default)]
    pub rating: i32,
    /// Comment texts, oldest first
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub background_color: Option<String>,
    /// Aggregated from the ratings table, never stored on the prompt row
    #[serde(default, skip_serializing)]
    pub star_rating: Option<StarRating>,
    #[serde(default)]
    pub copy_count: Option<i64>,
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub translated_text: Tristate<String>,
}

impl Prompt {
    pub fn is_favorite(&self) -> bool {
        self.rating == RATING_FAVORITE
    }

    /// Case-insensitive match against text, translation, tags and short id
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.text.to_lowercase().contains(&needle)
            || self
                .translated_text
                .as_option()
                .is_some_and(|t| t.to_lowercase().contains(&needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            || self
                .short_id
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(&needle))
    }
}

impl Record for Prompt {
    const TABLE: &'static str = TABLE_PROMPTS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_row_deserialize_with_defaults() {
        let json = r#"{
            "id": "p1",
            "text": "Um gato astronauta",
            "category_id": "c1",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;

        let prompt: Prompt = serde_json::from_str(json).unwrap();
        assert_eq!(prompt.rating, 0);
        assert!(prompt.comments.is_empty());
        assert!(prompt.star_rating.is_none());
        assert!(prompt.translated_text.is_unset());
    }

    #[test]
    fn test_prompt_row_keeps_null_translation() {
        let json = r#"{
            "id": "p1",
            "text": "Um gato astronauta",
            "category_id": "c1",
            "created_at": "2024-05-01T10:00:00Z",
            "translated_text": null,
            "tags": ["gato", "espaço"]
        }"#;

        let prompt: Prompt = serde_json::from_str(json).unwrap();
        assert!(prompt.translated_text.is_null());
        assert_eq!(prompt.tags.len(), 2);

        let back = serde_json::to_value(&prompt).unwrap();
        assert!(back["translated_text"].is_null());
        assert!(back.get("star_rating").is_none());
    }

    #[test]
    fn test_matches() {
        let json = r#"{
            "id": "p1",
            "text": "Um gato astronauta",
            "category_id": "c1",
            "created_at": "2024-05-01T10:00:00Z",
            "short_id": "P-1A2B3C",
            "translated_text": "An astronaut cat",
            "tags": ["sci-fi"]
        }"#;
        let prompt: Prompt = serde_json::from_str(json).unwrap();

        assert!(prompt.matches("GATO"));
        assert!(prompt.matches("astronaut cat"));
        assert!(prompt.matches("sci"));
        assert!(prompt.matches("p-1a2b3c"));
        assert!(!prompt.matches("cachorro"));
    }
}
