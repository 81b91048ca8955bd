use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::core::error::{AppError, Result};
use crate::features::refresh::bus::{RefreshBus, RefreshSignal};

/// Something that can reload one cached dataset
#[async_trait]
pub trait DatasetLoader: Send + Sync {
    async fn reload(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetState {
    Fresh,
    Stale,
    Refetching,
}

struct Dataset {
    loader: Arc<dyn DatasetLoader>,
    state: DatasetState,
    in_flight: usize,
}

type Datasets = HashMap<String, Dataset>;

/// Tracks registered datasets and drives their refetches
pub struct RefreshCoordinator {
    datasets: Mutex<Datasets>,
    bus: RefreshBus,
}

impl RefreshCoordinator {
    pub fn new(bus: RefreshBus) -> Self {
        Self {
            datasets: Mutex::new(HashMap::new()),
            bus,
        }
    }

    /// Register (or replace) the loader for `key`. New datasets start `Fresh`.
    pub fn register(&self, key: impl Into<String>, loader: Arc<dyn DatasetLoader>) {
        let key = key.into();
        tracing::debug!("Registering dataset '{}'", key);
        self.datasets().insert(
            key,
            Dataset {
                loader,
                state: DatasetState::Fresh,
                in_flight: 0,
            },
        );
    }

    pub fn state(&self, key: &str) -> Option<DatasetState> {
        self.datasets().get(key).map(|d| d.state)
    }

    /// Mark `key` stale. A refetch already in flight keeps it `Refetching`.
    pub fn invalidate(&self, key: &str) -> Result<()> {
        let mut datasets = self.datasets();
        let dataset = datasets.get_mut(key).ok_or_else(|| unknown(key))?;
        if dataset.in_flight == 0 {
            dataset.state = DatasetState::Stale;
        }
        Ok(())
    }

    /// Run the loader for `key`.
    ///
    /// The dataset is `Refetching` while any refetch is in flight and
    /// returns to `Fresh` once the last one resolves, whether it succeeded
    /// or not.
    pub async fn refetch(&self, key: &str) -> Result<()> {
        let (loader, _guard) = {
            let mut datasets = self.datasets();
            let dataset = datasets.get_mut(key).ok_or_else(|| unknown(key))?;
            dataset.in_flight += 1;
            dataset.state = DatasetState::Refetching;
            (
                Arc::clone(&dataset.loader),
                InFlight {
                    coordinator: self,
                    key,
                },
            )
        };

        let result = loader.reload().await;
        if let Err(ref e) = result {
            tracing::error!("Refetch of dataset '{}' failed: {:?}", key, e);
        }
        result
    }

    pub async fn refresh(&self, key: &str) -> Result<()> {
        self.invalidate(key)?;
        self.refetch(key).await
    }

    pub fn publish(&self, signal: RefreshSignal) -> usize {
        self.bus.publish(signal)
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<RefreshSignal> {
        self.bus.subscribe()
    }

    /// Refresh `key` every time prompts are reported updated, until the
    /// returned handle is dropped
    pub fn listen(self: &Arc<Self>, key: impl Into<String>) -> ListenerHandle {
        let key = key.into();
        let mut rx = self.bus.subscribe();
        let coordinator = Arc::clone(self);

        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(RefreshSignal::PromptsUpdated) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Refresh listener for '{}' lagged", key);
                    }
                    Err(RecvError::Closed) => break,
                }

                if let Err(e) = coordinator.refresh(&key).await {
                    tracing::warn!("Refresh of '{}' after signal failed: {}", key, e);
                }
            }
            tracing::debug!("Refresh listener for '{}' stopped", key);
        });

        ListenerHandle { task }
    }

    fn datasets(&self) -> MutexGuard<'_, Datasets> {
        self.datasets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn finish(&self, key: &str) {
        if let Some(dataset) = self.datasets().get_mut(key) {
            dataset.in_flight = dataset.in_flight.saturating_sub(1);
            if dataset.in_flight == 0 {
                dataset.state = DatasetState::Fresh;
            }
        }
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new(RefreshBus::default())
    }
}

fn unknown(key: &str) -> AppError {
    AppError::NotFound(format!("Dataset '{}' is not registered", key))
}

/// Releases one in-flight refetch, also when the refetch future is dropped
struct InFlight<'a> {
    coordinator: &'a RefreshCoordinator,
    key: &'a str,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.coordinator.finish(self.key);
    }
}

/// Subscription to refresh signals; unsubscribes when dropped
#[derive(Debug)]
pub struct ListenerHandle {
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
