use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::validation::trimmed;

// Create request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLinkDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(url)]
    pub url: String,

    pub description: Option<String>,
}

// Update request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLinkDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateLinkDto {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            url: self.url.trim().to_string(),
            description: trimmed(self.description.as_deref()),
        }
    }
}

impl UpdateLinkDto {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            url: self.url.map(|u| u.trim().to_string()),
            description: trimmed(self.description.as_deref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.description.is_none()
    }
}
