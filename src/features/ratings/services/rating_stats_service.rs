use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use crate::core::error::{AppError, Result};
use crate::features::ratings::models::{PromptRating, StarRating};
use crate::modules::gateway::{SelectQuery, Table, TableGateway};
use crate::shared::constants::{MAX_STARS, MIN_STARS};
use crate::shared::validation::require_id;

/// Service for star ratings and their per-prompt aggregates
pub struct RatingStatsService {
    table: Table<PromptRating>,
}

impl RatingStatsService {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            table: Table::new(gateway),
        }
    }

    pub async fn fetch_all(&self) -> Result<Vec<PromptRating>> {
        self.table.fetch_all().await
    }

    pub async fn submit(&self, prompt_id: &str, stars: i16) -> Result<PromptRating> {
        let prompt_id = require_id(prompt_id)?;
        if !(MIN_STARS..=MAX_STARS).contains(&stars) {
            return Err(AppError::Validation(format!(
                "stars must be between {} and {}, got {}",
                MIN_STARS, MAX_STARS, stars
            )));
        }

        self.table
            .insert(&json!({ "prompt_id": prompt_id, "stars": stars }))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.table.delete(id).await
    }

    /// Aggregate for one prompt; `None` when it has no ratings
    pub async fn stats_for(&self, prompt_id: &str) -> Result<Option<StarRating>> {
        let prompt_id = require_id(prompt_id)?;
        let ratings = self
            .table
            .fetch(&SelectQuery::new().eq("prompt_id", prompt_id))
            .await?;

        Ok(StarRating::from_scores(ratings.iter().map(|r| r.stars)))
    }

    /// Aggregates for every rated prompt, keyed by prompt id
    pub async fn all_stats(&self) -> Result<HashMap<String, StarRating>> {
        let mut grouped: HashMap<String, Vec<i16>> = HashMap::new();
        for rating in self.fetch_all().await? {
            grouped.entry(rating.prompt_id).or_default().push(rating.stars);
        }

        Ok(grouped
            .into_iter()
            .filter_map(|(prompt_id, scores)| {
                StarRating::from_scores(scores).map(|stats| (prompt_id, stats))
            })
            .collect())
    }
}
