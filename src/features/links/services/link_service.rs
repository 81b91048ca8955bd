use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::links::dtos::{CreateLinkDto, UpdateLinkDto};
use crate::features::links::models::Link;
use crate::modules::gateway::{Table, TableGateway};

/// Service for link operations
pub struct LinkService {
    table: Table<Link>,
}

impl LinkService {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            table: Table::new(gateway),
        }
    }

    /// All links, newest first
    pub async fn fetch_all(&self) -> Result<Vec<Link>> {
        self.table.fetch_all().await
    }

    pub async fn insert(&self, dto: CreateLinkDto) -> Result<Link> {
        let dto = dto.normalized();
        dto.validate()?;
        self.table.insert(&dto).await
    }

    pub async fn update(&self, id: &str, dto: UpdateLinkDto) -> Result<Link> {
        let dto = dto.normalized();
        dto.validate()?;
        if dto.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        self.table.update(id, &dto).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.table.delete(id).await
    }
}
