use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::Category;
use crate::modules::gateway::{SelectQuery, Table, TableGateway};
use crate::shared::validation::{require_id, trimmed};

/// Service for category operations
pub struct CategoryService {
    table: Table<Category>,
}

impl CategoryService {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            table: Table::new(gateway),
        }
    }

    /// List all categories (flat list, newest first)
    pub async fn fetch_all(&self) -> Result<Vec<Category>> {
        self.table.fetch_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Category> {
        let id = require_id(id)?;
        self.table
            .fetch(&SelectQuery::new().eq("id", id).limit(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    /// Create a category; the parent, when given, must already exist
    pub async fn insert(&self, dto: CreateCategoryDto) -> Result<Category> {
        let dto = CreateCategoryDto {
            name: dto.name.trim().to_string(),
            parent_id: trimmed(dto.parent_id.as_deref()),
        };
        dto.validate()?;

        if let Some(ref parent_id) = dto.parent_id {
            self.ensure_exists(parent_id).await?;
        }

        let category = self
            .table
            .insert(&json!({ "name": dto.name, "parent_id": dto.parent_id }))
            .await?;

        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    /// Rename or move a category. Moves that would create a cycle are rejected.
    pub async fn update(&self, id: &str, dto: UpdateCategoryDto) -> Result<Category> {
        let id = require_id(id)?;
        let dto = UpdateCategoryDto {
            name: dto.name.map(|n| n.trim().to_string()),
            parent_id: dto.parent_id.map(|p| trimmed(p.as_deref())),
        };
        dto.validate()?;
        if dto.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        if let Some(Some(ref parent_id)) = dto.parent_id {
            let all = self.fetch_all().await?;
            if !all.iter().any(|c| &c.id == parent_id) {
                return Err(AppError::Validation(format!(
                    "Parent category {} does not exist",
                    parent_id
                )));
            }
            if Self::would_cycle(&all, id, parent_id) {
                return Err(AppError::Validation(format!(
                    "Moving {} under {} would create a cycle",
                    id, parent_id
                )));
            }
        }

        self.table.update(id, &dto).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.table.delete(id).await?;
        tracing::info!("Deleted category {}", id.trim());
        Ok(())
    }

    async fn ensure_exists(&self, id: &str) -> Result<()> {
        match self.get_by_id(id).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => Err(AppError::Validation(format!(
                "Parent category {} does not exist",
                id
            ))),
            Err(e) => Err(e),
        }
    }

    /// True when `new_parent` is `id` itself or one of its descendants
    fn would_cycle(all: &[Category], id: &str, new_parent: &str) -> bool {
        let parents: HashMap<&str, Option<&str>> = all
            .iter()
            .map(|c| (c.id.as_str(), c.parent_id.as_deref()))
            .collect();

        let mut current = Some(new_parent);
        let mut steps = 0;
        while let Some(node) = current {
            if node == id {
                return true;
            }
            steps += 1;
            if steps > all.len() {
                // Existing data already loops; refuse to add to it
                return true;
            }
            current = parents.get(node).copied().flatten();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::TABLE_CATEGORIES;
    use crate::shared::test_helpers::{category, MockGateway, Op};

    fn service() -> (MockGateway, CategoryService) {
        let gateway = MockGateway::new();
        gateway.seed(
            TABLE_CATEGORIES,
            vec![
                serde_json::to_value(category("root", "Texto", None)).unwrap(),
                serde_json::to_value(category("child", "Retrato", Some("root"))).unwrap(),
            ],
        );
        let service = CategoryService::new(Arc::new(gateway.clone()));
        (gateway, service)
    }

    #[tokio::test]
    async fn test_insert_rejects_missing_parent() {
        let (gateway, service) = service();

        let result = service
            .insert(CreateCategoryDto {
                name: "Nova".to_string(),
                parent_id: Some("nope".to_string()),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(gateway.call_count(Op::Insert, TABLE_CATEGORIES), 0);
    }

    #[tokio::test]
    async fn test_insert_trims_name() {
        let (_, service) = service();

        let created = service
            .insert(CreateCategoryDto {
                name: "  Paisagem ".to_string(),
                parent_id: Some("root".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Paisagem");
        assert_eq!(created.parent_id.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn test_update_rejects_cycle() {
        let (gateway, service) = service();

        let result = service
            .update(
                "root",
                UpdateCategoryDto {
                    name: None,
                    parent_id: Some(Some("child".to_string())),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(gateway.call_count(Op::Update, TABLE_CATEGORIES), 0);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_without_request() {
        let (gateway, service) = service();

        let result = service.update("root", UpdateCategoryDto::default()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(gateway.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let (gateway, service) = service();

        assert!(matches!(
            service.delete("  ").await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(gateway.total_calls(), 0);
    }
}
