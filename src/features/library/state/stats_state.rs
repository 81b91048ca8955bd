use std::sync::Arc;

use serde::Serialize;

use crate::core::error::Result;
use crate::features::library::store::SharedStore;
use crate::features::prompts::PromptService;
use crate::features::ratings::models::StarRating;
use crate::features::ratings::RatingStatsService;
use crate::shared::notifications::{messages, Notification, Notifier};

/// Counters over the whole library
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub categories: usize,
    pub prompts: usize,
    pub favorites: usize,
    pub comments: usize,
    pub copies: i64,
    pub rated_prompts: usize,
}

/// Copy counters, star ratings and library-wide summaries
pub struct StatsState {
    store: SharedStore,
    prompts: Arc<PromptService>,
    ratings: Arc<RatingStatsService>,
    notifier: Arc<dyn Notifier>,
}

impl StatsState {
    pub fn new(
        store: SharedStore,
        prompts: Arc<PromptService>,
        ratings: Arc<RatingStatsService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            prompts,
            ratings,
            notifier,
        }
    }

    /// Bump the copy counter remotely and mirror the stored value locally
    pub async fn record_copy(&self, prompt_id: &str) -> Result<i64> {
        let updated = match self.prompts.increment_copy_count(prompt_id).await {
            Ok(p) => p,
            Err(e) => {
                self.notifier
                    .notify(Notification::error(messages::COPY_FAILED, e.user_message()));
                return Err(e);
            }
        };

        let count = updated.copy_count.unwrap_or(0);
        self.store
            .write()
            .await
            .patch_prompt(&updated.id, |p| p.copy_count = Some(count));

        self.notifier
            .notify(Notification::success(messages::COPY_RECORDED));
        Ok(count)
    }

    /// Submit a 1..=5 star rating and refresh the prompt's aggregate.
    ///
    /// Once the rating is stored the call succeeds. If the aggregate
    /// cannot be re-read, the new score is folded into the local one.
    pub async fn rate_stars(&self, prompt_id: &str, stars: i16) -> Result<Option<StarRating>> {
        let rating = match self.ratings.submit(prompt_id, stars).await {
            Ok(rating) => rating,
            Err(e) => {
                self.notifier.notify(Notification::error(
                    messages::STAR_RATING_FAILED,
                    e.user_message(),
                ));
                return Err(e);
            }
        };

        let stats = match self.ratings.stats_for(&rating.prompt_id).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(
                    "rate_stars: rating {} stored, aggregate re-read for {} failed: {}",
                    rating.id,
                    rating.prompt_id,
                    e
                );
                let current = self
                    .store
                    .read()
                    .await
                    .find_prompt(&rating.prompt_id)
                    .and_then(|p| p.star_rating);
                Some(StarRating::including(current, rating.stars))
            }
        };

        self.store
            .write()
            .await
            .patch_prompt(&rating.prompt_id, |p| p.star_rating = stats);

        self.notifier
            .notify(Notification::success(messages::STAR_RATING_RECORDED));
        Ok(stats)
    }

    pub async fn summary(&self) -> LibraryStats {
        let store = self.store.read().await;
        store.prompts().fold(
            LibraryStats {
                categories: store.category_count(),
                ..Default::default()
            },
            |mut acc, p| {
                acc.prompts += 1;
                acc.comments += p.comments.len();
                acc.copies += p.copy_count.unwrap_or(0);
                if p.is_favorite() {
                    acc.favorites += 1;
                }
                if p.star_rating.is_some() {
                    acc.rated_prompts += 1;
                }
                acc
            },
        )
    }
}
