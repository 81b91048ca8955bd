use std::sync::Arc;

use crate::core::error::Result;
use crate::features::library::store::SharedStore;
use crate::features::prompts::PromptService;
use crate::shared::constants::{RATING_FAVORITE, RATING_NONE};
use crate::shared::notifications::{messages, Notification, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    /// Remote write acknowledged, local prompt now carries this rating
    Updated(i32),
    /// Prompt not in the local store; nothing was written
    NotFound,
}

/// Favorite flag handling for prompts in the shared store
pub struct RatingState {
    store: SharedStore,
    prompts: Arc<PromptService>,
    notifier: Arc<dyn Notifier>,
}

impl RatingState {
    pub fn new(
        store: SharedStore,
        prompts: Arc<PromptService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            prompts,
            notifier,
        }
    }

    /// Set the favorite flag: `increment` stores 1, otherwise 0.
    ///
    /// The value is absolute, not a toggle. Local state changes only after
    /// the remote write succeeds.
    pub async fn rate_prompt(&self, prompt_id: &str, increment: bool) -> Result<RateOutcome> {
        let known = self.store.read().await.find_prompt(prompt_id).is_some();
        if !known {
            tracing::warn!("rate_prompt: prompt {} not found in local store", prompt_id);
            return Ok(RateOutcome::NotFound);
        }

        let rating = if increment { RATING_FAVORITE } else { RATING_NONE };

        if let Err(e) = self.prompts.set_rating(prompt_id, rating).await {
            let message = if increment {
                messages::FAVORITE_ADD_FAILED
            } else {
                messages::FAVORITE_REMOVE_FAILED
            };
            self.notifier
                .notify(Notification::error(message, e.user_message()));
            return Err(e);
        }

        let patched = self
            .store
            .write()
            .await
            .patch_prompt(prompt_id, |p| p.rating = rating);
        if !patched {
            tracing::warn!(
                "rate_prompt: prompt {} disappeared before the local update",
                prompt_id
            );
        }

        self.notifier.notify(Notification::success(if increment {
            messages::FAVORITE_ADDED
        } else {
            messages::FAVORITE_REMOVED
        }));

        Ok(RateOutcome::Updated(rating))
    }
}
