use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::prompts::dtos::{CreatePromptDto, UpdatePromptDto};
use crate::features::prompts::models::Prompt;
use crate::modules::gateway::{SelectQuery, Table, TableGateway};
use crate::shared::constants::{RATING_FAVORITE, RATING_NONE};
use crate::shared::validation::{require_id, trimmed};

/// Human-readable short identifier, e.g. `P-3F9A1C`
fn generate_short_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("P-{}", hex[..6].to_uppercase())
}

/// Service for text prompt rows
pub struct PromptService {
    table: Table<Prompt>,
}

impl PromptService {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            table: Table::new(gateway),
        }
    }

    /// All prompts, newest first
    pub async fn fetch_all(&self) -> Result<Vec<Prompt>> {
        self.table.fetch_all().await
    }

    pub async fn fetch_by_category(&self, category_id: &str) -> Result<Vec<Prompt>> {
        let category_id = require_id(category_id)?;
        self.table
            .fetch(&SelectQuery::new().eq("category_id", category_id).newest_first())
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Prompt> {
        let id = require_id(id)?;
        self.table
            .fetch(&SelectQuery::new().eq("id", id).limit(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Prompt with id {} not found", id)))
    }

    pub async fn insert(&self, dto: CreatePromptDto) -> Result<Prompt> {
        let dto = dto.normalized();
        dto.validate()?;

        let short_id = dto.short_id.clone().unwrap_or_else(generate_short_id);
        let mut row = json!({
            "text": dto.text,
            "category_id": dto.category_id,
            "tags": dto.tags,
            "rating": RATING_NONE,
            "short_id": short_id,
        });
        if !dto.translated_text.is_unset() {
            row["translated_text"] = serde_json::to_value(&dto.translated_text)?;
        }

        let prompt = self.table.insert(&row).await?;
        tracing::info!("Created prompt {} in category {}", prompt.id, prompt.category_id);
        Ok(prompt)
    }

    pub async fn update(&self, id: &str, dto: UpdatePromptDto) -> Result<Prompt> {
        let dto = dto.normalized();
        dto.validate()?;
        if dto.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        self.table.update(id, &dto).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.table.delete(id).await?;
        tracing::info!("Deleted prompt {}", id.trim());
        Ok(())
    }

    /// Set the legacy favorite flag to an absolute value (0 or 1)
    pub async fn set_rating(&self, id: &str, rating: i32) -> Result<Prompt> {
        if rating != RATING_FAVORITE && rating != RATING_NONE {
            return Err(AppError::Validation(format!(
                "rating must be {} or {}, got {}",
                RATING_NONE, RATING_FAVORITE, rating
            )));
        }

        self.table.update(id, &json!({ "rating": rating })).await
    }

    /// Set or clear the prompt's background color tag
    pub async fn set_background_color(&self, id: &str, color: Option<&str>) -> Result<Prompt> {
        let color = trimmed(color);
        self.table
            .update(id, &json!({ "background_color": color }))
            .await
    }

    /// Store a translation, or `None` to mark it explicitly absent
    pub async fn set_translation(&self, id: &str, text: Option<&str>) -> Result<Prompt> {
        let text = trimmed(text);
        self.table
            .update(id, &json!({ "translated_text": text }))
            .await
    }

    /// Read the current copy counter and write it back incremented.
    ///
    /// Not atomic: concurrent increments resolve last-write-wins in the store.
    pub async fn increment_copy_count(&self, id: &str) -> Result<Prompt> {
        let current = self.get_by_id(id).await?;
        let next = current.copy_count.unwrap_or(0) + 1;
        self.table
            .update(&current.id, &json!({ "copy_count": next }))
            .await
    }
}
