use std::sync::Arc;

use crate::core::error::Result;
use crate::features::comments::models::ColorDirective;
use crate::features::comments::CommentService;
use crate::features::library::store::SharedStore;
use crate::shared::notifications::{messages, Notification, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentOutcome {
    pub comment_id: String,
    /// Color applied to the prompt when the comment was a color directive
    pub background_color: Option<String>,
}

/// Comment handling for prompts in the shared store
pub struct CommentState {
    store: SharedStore,
    comments: Arc<CommentService>,
    notifier: Arc<dyn Notifier>,
}

impl CommentState {
    pub fn new(
        store: SharedStore,
        comments: Arc<CommentService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            comments,
            notifier,
        }
    }

    /// Add a comment remotely, then append it locally.
    ///
    /// A `[color:<value>]` comment also sets the prompt's background color;
    /// the color is written first and a failure there aborts the insert.
    pub async fn add_comment(&self, prompt_id: &str, text: &str) -> Result<CommentOutcome> {
        let is_directive = ColorDirective::parse(text).is_some();

        let added = match self.comments.add_comment(prompt_id, text).await {
            Ok(added) => added,
            Err(e) => {
                let message = if is_directive {
                    messages::COLOR_FAILED
                } else {
                    messages::COMMENT_FAILED
                };
                self.notifier
                    .notify(Notification::error(message, e.user_message()));
                return Err(e);
            }
        };

        let stored_text = added.comment.text.clone();
        let color = added.background_color.clone();
        let patched = self
            .store
            .write()
            .await
            .patch_prompt(&added.comment.prompt_id, |p| {
                p.comments.push(stored_text);
                if let Some(color) = color {
                    p.background_color = Some(color);
                }
            });
        if !patched {
            tracing::warn!(
                "add_comment: prompt {} not in local store, comment {} kept remote only",
                added.comment.prompt_id,
                added.comment.id
            );
        }

        self.notifier.notify(Notification::success(
            if added.background_color.is_some() {
                messages::COLOR_UPDATED
            } else {
                messages::COMMENT_ADDED
            },
        ));

        Ok(CommentOutcome {
            comment_id: added.comment.id,
            background_color: added.background_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::library::store::PromptStore;
    use crate::features::prompts::PromptService;
    use crate::modules::gateway::TableGateway;
    use crate::shared::constants::{TABLE_COMMENTS, TABLE_PROMPTS};
    use crate::shared::test_helpers::{category, prompt, MockGateway, Op, RecordingNotifier};

    struct Fixture {
        gateway: MockGateway,
        notifier: RecordingNotifier,
        store: SharedStore,
        state: CommentState,
    }

    fn fixture() -> Fixture {
        let gateway = MockGateway::new();
        let p1 = prompt("p1", "c1");
        let p2 = prompt("p2", "c1");
        gateway.seed(
            TABLE_PROMPTS,
            vec![
                serde_json::to_value(&p1).unwrap(),
                serde_json::to_value(&p2).unwrap(),
            ],
        );

        let mut store = PromptStore::new();
        store.replace_all(vec![category("c1", "Imagem", None)], vec![p1, p2]);
        let store = store.shared();

        let shared: Arc<dyn TableGateway> = Arc::new(gateway.clone());
        let prompts = Arc::new(PromptService::new(Arc::clone(&shared)));
        let notifier = RecordingNotifier::new();
        let state = CommentState::new(
            Arc::clone(&store),
            Arc::new(CommentService::new(shared, prompts)),
            Arc::new(notifier.clone()),
        );

        Fixture {
            gateway,
            notifier,
            store,
            state,
        }
    }

    #[tokio::test]
    async fn test_color_comment_appends_and_sets_color() {
        let f = fixture();
        let untouched = f.store.read().await.find_prompt("p2").cloned();

        let outcome = f.state.add_comment("p1", "[color:#ff0000]").await.unwrap();

        assert_eq!(outcome.background_color.as_deref(), Some("#ff0000"));
        let store = f.store.read().await;
        let p1 = store.find_prompt("p1").unwrap();
        assert_eq!(p1.comments, vec!["[color:#ff0000]".to_string()]);
        assert_eq!(p1.background_color.as_deref(), Some("#ff0000"));
        assert_eq!(store.find_prompt("p2").cloned(), untouched);
        assert_eq!(f.notifier.messages(), vec![messages::COLOR_UPDATED]);
    }

    #[tokio::test]
    async fn test_plain_comment_only_inserts() {
        let f = fixture();

        f.state.add_comment("p1", "Ficou lindo").await.unwrap();

        assert_eq!(f.gateway.call_count(Op::Update, TABLE_PROMPTS), 0);
        assert_eq!(f.gateway.call_count(Op::Insert, TABLE_COMMENTS), 1);
        let store = f.store.read().await;
        let p1 = store.find_prompt("p1").unwrap();
        assert_eq!(p1.comments, vec!["Ficou lindo".to_string()]);
        assert!(p1.background_color.is_none());
        assert_eq!(f.notifier.messages(), vec![messages::COMMENT_ADDED]);
    }

    #[tokio::test]
    async fn test_failed_color_update_aborts_everything() {
        let f = fixture();
        f.gateway.fail_on(Op::Update, TABLE_PROMPTS, "quota exceeded");
        let version = f.store.read().await.version();

        let result = f.state.add_comment("p1", "[color:#123456]").await;

        assert!(result.is_err());
        assert_eq!(f.gateway.call_count(Op::Insert, TABLE_COMMENTS), 0);
        assert_eq!(f.store.read().await.version(), version);
        assert_eq!(f.notifier.messages(), vec![messages::COLOR_FAILED]);
    }

    #[tokio::test]
    async fn test_invalid_color_comment_keeps_remote_and_local_color() {
        let f = fixture();
        let version = f.store.read().await.version();
        let text = format!("[color:#abcdef] {}", "y".repeat(2100));

        assert!(f.state.add_comment("p1", &text).await.is_err());

        assert_eq!(f.gateway.call_count(Op::Update, TABLE_PROMPTS), 0);
        assert_eq!(f.store.read().await.version(), version);
        assert!(f.store.read().await.find_prompt("p1").unwrap().background_color.is_none());
        assert_eq!(f.notifier.messages(), vec![messages::COLOR_FAILED]);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_store_untouched() {
        let f = fixture();
        f.gateway.fail_on(Op::Insert, TABLE_COMMENTS, "conflict");
        let version = f.store.read().await.version();

        let result = f.state.add_comment("p1", "oi").await;

        assert!(result.is_err());
        assert_eq!(f.store.read().await.version(), version);
        assert!(f.store.read().await.find_prompt("p1").unwrap().comments.is_empty());
        assert_eq!(f.notifier.messages(), vec![messages::COMMENT_FAILED]);
    }
}
