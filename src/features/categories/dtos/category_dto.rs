use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::categories::models::Category;
use crate::features::prompts::models::Prompt;

// Create request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    pub parent_id: Option<String>,
}

// Update request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    /// `Some(None)` moves the category to the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<String>>,
}

impl UpdateCategoryDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}

/// Category with its subcategories and prompts (hierarchical view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub subcategories: Vec<CategoryNode>,
    pub prompts: Vec<Prompt>,
}

impl CategoryNode {
    /// Build a forest from a flat list of categories.
    ///
    /// Categories whose parent does not resolve are promoted to roots.
    /// Categories only reachable through a parent cycle are dropped.
    pub fn build_tree(
        categories: &[Category],
        prompts: &HashMap<String, Vec<Prompt>>,
    ) -> Vec<CategoryNode> {
        let known: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();

        let roots: Vec<&Category> = categories
            .iter()
            .filter(|c| match c.parent_id.as_deref() {
                None => true,
                Some(parent) if !known.contains(parent) => {
                    tracing::warn!(
                        "Category {} references missing parent {}, treating as root",
                        c.id,
                        parent
                    );
                    true
                }
                Some(_) => false,
            })
            .collect();

        let unplaced = Self::unplaced_prompts(categories, prompts);
        if !unplaced.is_empty() {
            let ids: Vec<&str> = unplaced.iter().map(|p| p.id.as_str()).collect();
            tracing::warn!(
                "{} prompt(s) reference unknown categories and are not in the tree: {:?}",
                ids.len(),
                ids
            );
        }

        let mut visited = HashSet::new();
        let tree: Vec<CategoryNode> = roots
            .into_iter()
            .map(|root| Self::build_node(root, categories, prompts, &mut visited))
            .collect();

        if visited.len() < categories.len() {
            tracing::warn!(
                "{} categories are part of a parent cycle and were skipped",
                categories.len() - visited.len()
            );
        }

        tree
    }

    fn build_node(
        category: &Category,
        all_categories: &[Category],
        prompts: &HashMap<String, Vec<Prompt>>,
        visited: &mut HashSet<String>,
    ) -> CategoryNode {
        visited.insert(category.id.clone());

        let mut subcategories = Vec::new();
        for child in all_categories
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(category.id.as_str()))
        {
            if visited.contains(&child.id) {
                continue;
            }
            subcategories.push(Self::build_node(child, all_categories, prompts, visited));
        }

        CategoryNode {
            id: category.id.clone(),
            name: category.name.clone(),
            parent_id: category.parent_id.clone(),
            subcategories,
            prompts: prompts.get(&category.id).cloned().unwrap_or_default(),
        }
    }

    /// Prompts whose category is not in `categories`
    pub fn unplaced_prompts<'a>(
        categories: &[Category],
        prompts: &'a HashMap<String, Vec<Prompt>>,
    ) -> Vec<&'a Prompt> {
        let known: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
        prompts
            .iter()
            .filter(|(category_id, _)| !known.contains(category_id.as_str()))
            .flat_map(|(_, list)| list.iter())
            .collect()
    }

    /// Depth-first iterator over every prompt in this subtree
    pub fn all_prompts(&self) -> Vec<&Prompt> {
        let mut out: Vec<&Prompt> = self.prompts.iter().collect();
        for sub in &self.subcategories {
            out.extend(sub.all_prompts());
        }
        out
    }
}
