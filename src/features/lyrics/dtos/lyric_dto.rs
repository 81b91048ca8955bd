use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::validation::trimmed;

// Create request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLyricDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[validate(length(max = 200))]
    pub style: Option<String>,
}

// Update request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLyricDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub style: Option<String>,
}

impl CreateLyricDto {
    /// Trims title and style; lyric content keeps its line layout
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: self.content.trim_matches('\n').to_string(),
            style: trimmed(self.style.as_deref()),
        }
    }
}

impl UpdateLyricDto {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            content: self.content.map(|c| c.trim_matches('\n').to_string()),
            style: trimmed(self.style.as_deref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.style.is_none()
    }
}
