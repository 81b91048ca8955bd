use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::lyrics::dtos::{CreateLyricDto, UpdateLyricDto};
use crate::features::lyrics::models::Lyric;
use crate::modules::gateway::{Table, TableGateway};

/// Service for lyric operations
pub struct LyricService {
    table: Table<Lyric>,
}

impl LyricService {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            table: Table::new(gateway),
        }
    }

    /// All lyrics, newest first
    pub async fn fetch_all(&self) -> Result<Vec<Lyric>> {
        self.table.fetch_all().await
    }

    pub async fn insert(&self, dto: CreateLyricDto) -> Result<Lyric> {
        let dto = dto.normalized();
        dto.validate()?;
        let lyric = self.table.insert(&dto).await?;
        tracing::info!("Created lyric {} ({})", lyric.id, lyric.title);
        Ok(lyric)
    }

    pub async fn update(&self, id: &str, dto: UpdateLyricDto) -> Result<Lyric> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::TABLE_LYRICS;
    use crate::shared::test_helpers::{MockGateway, Op};

    #[tokio::test]
    async fn test_insert_keeps_inner_line_breaks() {
        let gateway = MockGateway::new();
        let service = LyricService::new(Arc::new(gateway));

        let lyric = service
            .insert(CreateLyricDto {
                title: "Maré".to_string(),
                content: "\nverso um\nverso dois\n".to_string(),
                style: Some(" samba ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(lyric.content, "verso um\nverso dois");
        assert_eq!(lyric.style.as_deref(), Some("samba"));
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected_without_request() {
        let gateway = MockGateway::new();
        let service = LyricService::new(Arc::new(gateway.clone()));

        let result = service.update("l1", UpdateLyricDto::default()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(gateway.call_count(Op::Update, TABLE_LYRICS), 0);
    }

    #[tokio::test]
    async fn test_delete_failure_surfaces_as_error() {
        let gateway = MockGateway::new();
        gateway.fail_on(Op::Delete, TABLE_LYRICS, "row is referenced");
        let service = LyricService::new(Arc::new(gateway));

        let err = service.delete("l1").await.unwrap_err();

        assert!(matches!(err, AppError::Gateway(_)));
        assert_eq!(err.user_message(), "row is referenced");
    }
}
