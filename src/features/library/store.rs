//! In-memory category/prompt store
//!
//! Entities are kept in an arena keyed by id. Mutations patch one entity
//! and bump [`PromptStore::version`] so readers can tell when to re-render;
//! the hierarchical view is materialised on demand with [`PromptStore::tree`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::features::categories::dtos::CategoryNode;
use crate::features::categories::models::Category;
use crate::features::prompts::models::Prompt;

pub type SharedStore = Arc<RwLock<PromptStore>>;

#[derive(Debug, Default)]
pub struct PromptStore {
    categories: Vec<Category>,
    prompts: HashMap<String, Prompt>,
    /// Prompt ids per category, in display order
    order: HashMap<String, Vec<String>>,
    version: u64,
}

impl PromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Replace the whole contents, keeping the given prompt order per category
    pub fn replace_all(&mut self, categories: Vec<Category>, prompts: Vec<Prompt>) {
        self.categories = categories;
        self.prompts.clear();
        self.order.clear();

        for prompt in prompts {
            self.order
                .entry(prompt.category_id.clone())
                .or_default()
                .push(prompt.id.clone());
            self.prompts.insert(prompt.id.clone(), prompt);
        }

        self.bump();
    }

    /// Monotonic counter incremented on every successful mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn prompts(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.values()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }

    pub fn find_prompt(&self, id: &str) -> Option<&Prompt> {
        self.prompts.get(id)
    }

    /// Apply `f` to one prompt. Returns `false` (and leaves the version
    /// untouched) when the prompt is not in the store.
    pub fn patch_prompt<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Prompt),
    {
        match self.prompts.get_mut(id) {
            Some(prompt) => {
                f(prompt);
                self.bump();
                true
            }
            None => false,
        }
    }

    /// Add a prompt at the top of its category
    pub fn insert_prompt(&mut self, prompt: Prompt) {
        if let Some(old) = self.prompts.get(&prompt.id) {
            let old_category = old.category_id.clone();
            self.unlink(&old_category, &prompt.id);
        }
        self.order
            .entry(prompt.category_id.clone())
            .or_default()
            .insert(0, prompt.id.clone());
        self.prompts.insert(prompt.id.clone(), prompt);
        self.bump();
    }

    pub fn remove_prompt(&mut self, id: &str) -> Option<Prompt> {
        let prompt = self.prompts.remove(id)?;
        self.unlink(&prompt.category_id, id);
        self.bump();
        Some(prompt)
    }

    /// Materialise the category forest with prompts attached
    pub fn tree(&self) -> Vec<CategoryNode> {
        let grouped: HashMap<String, Vec<Prompt>> = self
            .order
            .iter()
            .map(|(category_id, ids)| {
                let prompts = ids
                    .iter()
                    .filter_map(|id| self.prompts.get(id).cloned())
                    .collect();
                (category_id.clone(), prompts)
            })
            .collect();

        CategoryNode::build_tree(&self.categories, &grouped)
    }

    /// Prompts matching `query` (text, translation, tags or short id), newest first
    pub fn search(&self, query: &str) -> Vec<&Prompt> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<&Prompt> = self.prompts.values().filter(|p| p.matches(query)).collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        hits
    }

    /// Prompts whose category is not loaded; `tree()` cannot place them
    pub fn unplaced_prompts(&self) -> Vec<&Prompt> {
        self.prompts
            .values()
            .filter(|p| !self.categories.iter().any(|c| c.id == p.category_id))
            .collect()
    }

    fn unlink(&mut self, category_id: &str, id: &str) {
        if let Some(ids) = self.order.get_mut(category_id) {
            ids.retain(|p| p != id);
        }
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}
