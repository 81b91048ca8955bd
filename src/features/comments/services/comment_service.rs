use std::sync::Arc;

use validator::Validate;

use crate::core::error::Result;
use crate::features::comments::dtos::{AddedComment, CreateCommentDto};
use crate::features::comments::models::{ColorDirective, Comment};
use crate::features::prompts::PromptService;
use crate::modules::gateway::{SelectQuery, Table, TableGateway};
use crate::shared::validation::require_id;

/// Service for prompt comments
pub struct CommentService {
    table: Table<Comment>,
    prompts: Arc<PromptService>,
}

impl CommentService {
    pub fn new(gateway: Arc<dyn TableGateway>, prompts: Arc<PromptService>) -> Self {
        Self {
            table: Table::new(gateway),
            prompts,
        }
    }

    /// All comments, newest first
    pub async fn fetch_all(&self) -> Result<Vec<Comment>> {
        self.table.fetch_all().await
    }

    pub async fn fetch_for_prompt(&self, prompt_id: &str) -> Result<Vec<Comment>> {
        let prompt_id = require_id(prompt_id)?;
        self.table
            .fetch(&SelectQuery::new().eq("prompt_id", prompt_id).newest_first())
            .await
    }

    /// Insert the comment row only. The text is stored as given.
    pub async fn record_comment(&self, prompt_id: &str, text: &str) -> Result<Comment> {
        let dto = CreateCommentDto::new(prompt_id, text);
        dto.validate()?;
        self.insert(&dto).await
    }

    /// Record a comment, applying its color directive first when it has one.
    ///
    /// The comment is validated before anything is written. Then
    /// `PromptService::set_background_color` runs, then the insert; if the
    /// color update fails the comment is not inserted.
    pub async fn add_comment(&self, prompt_id: &str, text: &str) -> Result<AddedComment> {
        let prompt_id = require_id(prompt_id)?;
        let dto = CreateCommentDto::new(prompt_id, text);
        dto.validate()?;
        let directive = ColorDirective::parse(&dto.text);

        if let Some(ref directive) = directive {
            self.prompts
                .set_background_color(&dto.prompt_id, Some(&directive.color))
                .await?;
            tracing::debug!(
                "Applied background color {} to prompt {}",
                directive.color,
                dto.prompt_id
            );
        }

        let comment = self.insert(&dto).await?;

        Ok(AddedComment {
            comment,
            background_color: directive.map(|d| d.color),
        })
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.table.delete(id).await
    }

    async fn insert(&self, dto: &CreateCommentDto) -> Result<Comment> {
        let comment = self.table.insert(dto).await?;
        tracing::debug!("Recorded comment {} on prompt {}", comment.id, comment.prompt_id);
        Ok(comment)
    }
}
