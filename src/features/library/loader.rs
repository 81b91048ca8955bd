use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::CategoryService;
use crate::features::comments::models::Comment;
use crate::features::comments::CommentService;
use crate::features::library::store::SharedStore;
use crate::features::prompts::PromptService;
use crate::features::ratings::RatingStatsService;
use crate::features::refresh::DatasetLoader;

/// Counts reported after a full load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub categories: usize,
    pub prompts: usize,
    pub comments: usize,
    pub version: u64,
}

/// Fetches categories, prompts, comments and star ratings and installs
/// them into the shared store in one swap
pub struct LibraryLoader {
    store: SharedStore,
    categories: Arc<CategoryService>,
    prompts: Arc<PromptService>,
    comments: Arc<CommentService>,
    ratings: Arc<RatingStatsService>,
}

impl LibraryLoader {
    pub fn new(
        store: SharedStore,
        categories: Arc<CategoryService>,
        prompts: Arc<PromptService>,
        comments: Arc<CommentService>,
        ratings: Arc<RatingStatsService>,
    ) -> Self {
        Self {
            store,
            categories,
            prompts,
            comments,
            ratings,
        }
    }

    pub async fn load(&self) -> Result<LoadSummary> {
        let (categories, mut prompts, comments, stats) = futures::try_join!(
            self.categories.fetch_all(),
            self.prompts.fetch_all(),
            self.comments.fetch_all(),
            self.ratings.all_stats(),
        )?;

        let comment_count = comments.len();
        let mut by_prompt = group_comments(comments);

        for prompt in prompts.iter_mut() {
            if let Some(texts) = by_prompt.remove(&prompt.id) {
                prompt.comments = texts;
            }
            prompt.star_rating = stats.get(&prompt.id).copied();
        }

        if !by_prompt.is_empty() {
            tracing::warn!(
                "{} prompt(s) referenced by comments were not found",
                by_prompt.len()
            );
        }

        let summary = {
            let mut store = self.store.write().await;
            let category_count = categories.len();
            let prompt_count = prompts.len();
            store.replace_all(categories, prompts);
            LoadSummary {
                categories: category_count,
                prompts: prompt_count,
                comments: comment_count,
                version: store.version(),
            }
        };

        tracing::info!(
            "Library loaded: {} categories, {} prompts, {} comments (version {})",
            summary.categories,
            summary.prompts,
            summary.comments,
            summary.version
        );
        Ok(summary)
    }
}

/// Comment texts per prompt, oldest first
fn group_comments(mut comments: Vec<Comment>) -> HashMap<String, Vec<String>> {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for comment in comments {
        grouped.entry(comment.prompt_id).or_default().push(comment.text);
    }
    grouped
}

#[async_trait]
impl DatasetLoader for LibraryLoader {
    async fn reload(&self) -> Result<()> {
        self.load().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::library::store::PromptStore;
    use crate::modules::gateway::TableGateway;
    use crate::shared::constants::{TABLE_CATEGORIES, TABLE_COMMENTS, TABLE_PROMPTS};
    use crate::shared::test_helpers::{category, prompt, MockGateway, Op};
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn loader(gateway: &MockGateway) -> (SharedStore, LibraryLoader) {
        let shared: Arc<dyn TableGateway> = Arc::new(gateway.clone());
        let store = PromptStore::new().shared();
        let prompts = Arc::new(PromptService::new(Arc::clone(&shared)));
        let loader = LibraryLoader::new(
            Arc::clone(&store),
            Arc::new(CategoryService::new(Arc::clone(&shared))),
            Arc::clone(&prompts),
            Arc::new(CommentService::new(Arc::clone(&shared), prompts)),
            Arc::new(RatingStatsService::new(shared)),
        );
        (store, loader)
    }

    #[tokio::test]
    async fn test_load_attaches_comments_and_stats() {
        let gateway = MockGateway::new();
        gateway.seed(
            TABLE_CATEGORIES,
            vec![serde_json::to_value(category("c1", "Imagem", None)).unwrap()],
        );
        gateway.seed(
            TABLE_PROMPTS,
            vec![serde_json::to_value(prompt("p1", "c1")).unwrap()],
        );
        let now = Utc::now();
        gateway.seed(
            TABLE_COMMENTS,
            vec![
                json!({"id": "k2", "prompt_id": "p1", "text": "segundo", "created_at": now}),
                json!({"id": "k1", "prompt_id": "p1", "text": "primeiro",
                       "created_at": now - Duration::minutes(5)}),
            ],
        );
        gateway.seed(
            "prompt_ratings",
            vec![json!({"id": "r1", "prompt_id": "p1", "stars": 4, "created_at": now})],
        );
        let (store, loader) = loader(&gateway);

        let summary = loader.load().await.unwrap();

        assert_eq!(summary.prompts, 1);
        assert_eq!(summary.comments, 2);
        let store = store.read().await;
        let p1 = store.find_prompt("p1").unwrap();
        assert_eq!(p1.comments, vec!["primeiro".to_string(), "segundo".to_string()]);
        assert_eq!(p1.star_rating.unwrap().count, 1);
        assert_eq!(store.tree()[0].prompts.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_contents() {
        let gateway = MockGateway::new();
        gateway.seed(
            TABLE_PROMPTS,
            vec![serde_json::to_value(prompt("p1", "c1")).unwrap()],
        );
        let (store, loader) = loader(&gateway);
        loader.load().await.unwrap();
        let version = store.read().await.version();

        gateway.fail_on(Op::Select, TABLE_COMMENTS, "offline");
        assert!(loader.load().await.is_err());

        let store = store.read().await;
        assert_eq!(store.version(), version);
        assert!(store.find_prompt("p1").is_some());
    }
}
