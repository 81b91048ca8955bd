use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::gateway::Record;
use crate::shared::constants::TABLE_COMMENTS;
use crate::shared::validation::COLOR_DIRECTIVE_REGEX;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub prompt_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Comment {
    const TABLE: &'static str = TABLE_COMMENTS;
}

/// Background color carried by a `[color:<value>]` comment prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDirective {
    pub color: String,
}

impl ColorDirective {
    pub fn parse(text: &str) -> Option<Self> {
        COLOR_DIRECTIVE_REGEX
            .captures(text.trim_start())
            .and_then(|caps| caps.get(1))
            .map(|m| Self {
                color: m.as_str().to_string(),
            })
    }

    /// Comment text that encodes this directive
    pub fn to_comment_text(&self) -> String {
        format!("[color:{}]", self.color)
    }
}
