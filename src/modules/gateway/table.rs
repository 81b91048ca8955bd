use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{Filter, SelectQuery, TableGateway};
use crate::core::error::{AppError, Result};
use crate::shared::validation::require_id;

/// A typed row stored in one remote table
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const TABLE: &'static str;
}

/// Typed repository over a [`TableGateway`] for one [`Record`] type
pub struct Table<T> {
    gateway: Arc<dyn TableGateway>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Table<T> {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            gateway,
            _record: PhantomData,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn TableGateway> {
        &self.gateway
    }

    pub async fn fetch(&self, query: &SelectQuery) -> Result<Vec<T>> {
        let rows = self.gateway.select(T::TABLE, query).await.map_err(|e| {
            tracing::error!("Failed to fetch from {}: {}", T::TABLE, e);
            AppError::Gateway(e)
        })?;

        rows.into_iter().map(Self::decode).collect()
    }

    /// All rows, newest-created first
    pub async fn fetch_all(&self) -> Result<Vec<T>> {
        self.fetch(&SelectQuery::new().newest_first()).await
    }

    pub async fn insert<I: Serialize>(&self, row: &I) -> Result<T> {
        let value = serde_json::to_value(row)?;
        let rows = self
            .gateway
            .insert(T::TABLE, vec![value])
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert into {}: {}", T::TABLE, e);
                AppError::Gateway(e)
            })?;

        rows.into_iter()
            .next()
            .map(Self::decode)
            .unwrap_or_else(|| {
                Err(AppError::ExternalServiceError(format!(
                    "Insert into {} returned no row",
                    T::TABLE
                )))
            })
    }

    /// Patch the row with the given id and return it as stored
    pub async fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<T> {
        let id = require_id(id)?;
        let patch = serde_json::to_value(patch)?;
        let rows = self
            .gateway
            .update(T::TABLE, patch, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!("Failed to update {} in {}: {}", id, T::TABLE, e);
                AppError::Gateway(e)
            })?;

        rows.into_iter()
            .next()
            .map(Self::decode)
            .unwrap_or_else(|| {
                Err(AppError::NotFound(format!(
                    "{} with id {} not found",
                    T::TABLE,
                    id
                )))
            })
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = require_id(id)?;
        self.gateway
            .delete(T::TABLE, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete {} from {}: {}", id, T::TABLE, e);
                AppError::Gateway(e)
            })
    }

    fn decode(row: Value) -> Result<T> {
        serde_json::from_value(row).map_err(|e| {
            tracing::error!("Failed to decode {} row: {}", T::TABLE, e);
            AppError::Serialization(e)
        })
    }
}
