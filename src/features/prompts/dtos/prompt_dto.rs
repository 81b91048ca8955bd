use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::shared::types::Tristate;
use crate::shared::validation::TAG_REGEX;

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().all(|t| TAG_REGEX.is_match(t)) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_tag"))
    }
}

// Create request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePromptDto {
    #[validate(length(min = 1))]
    pub text: String,

    #[validate(length(min = 1))]
    pub category_id: String,

    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,

    /// Generated when absent
    #[validate(length(min = 1, max = 32))]
    pub short_id: Option<String>,

    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub translated_text: Tristate<String>,
}

// Update request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePromptDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub category_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,

    /// `Unset` leaves the column alone, `Null` clears it
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub translated_text: Tristate<String>,
}

impl CreatePromptDto {
    /// Trim text fields and drop blank tags
    pub fn normalized(self) -> Self {
        Self {
            text: self.text.trim().to_string(),
            category_id: self.category_id.trim().to_string(),
            tags: normalize_tags(self.tags),
            short_id: self
                .short_id
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            translated_text: self.translated_text,
        }
    }
}

impl UpdatePromptDto {
    pub fn normalized(self) -> Self {
        Self {
            text: self.text.map(|t| t.trim().to_string()),
            category_id: self.category_id.map(|c| c.trim().to_string()),
            tags: self.tags.map(normalize_tags),
            translated_text: self.translated_text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.category_id.is_none()
            && self.tags.is_none()
            && self.translated_text.is_unset()
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
