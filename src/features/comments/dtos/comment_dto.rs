use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::comments::models::Comment;

// Create request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentDto {
    #[validate(length(min = 1))]
    pub prompt_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

impl CreateCommentDto {
    /// Trimmed, not yet validated
    pub fn new(prompt_id: &str, text: &str) -> Self {
        Self {
            prompt_id: prompt_id.trim().to_string(),
            text: text.trim().to_string(),
        }
    }
}

/// Result of the comment façade: the stored comment and the color it applied
#[derive(Debug, Clone, PartialEq)]
pub struct AddedComment {
    pub comment: Comment,
    pub background_color: Option<String>,
}
