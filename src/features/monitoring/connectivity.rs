use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::core::config::MonitorConfig;
use crate::features::monitoring::probe;
use crate::modules::gateway::TableGateway;
use crate::shared::notifications::{messages, Notification, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Online,
    Offline,
}

/// Transition reported by the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl From<ConnectivityEvent> for ConnectivityStatus {
    fn from(event: ConnectivityEvent) -> Self {
        match event {
            ConnectivityEvent::Online => ConnectivityStatus::Online,
            ConnectivityEvent::Offline => ConnectivityStatus::Offline,
        }
    }
}

pub struct ConnectivityMonitor {
    gateway: Arc<dyn TableGateway>,
    probe_table: String,
    notifier: Arc<dyn Notifier>,
    status: watch::Sender<ConnectivityStatus>,
    retrying: AtomicBool,
}

impl ConnectivityMonitor {
    pub fn new(
        gateway: Arc<dyn TableGateway>,
        config: &MonitorConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (status, _) = watch::channel(ConnectivityStatus::Online);
        Self {
            gateway,
            probe_table: config.probe_table.clone(),
            notifier,
            status,
            retrying: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> ConnectivityStatus {
        *self.status.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<ConnectivityStatus> {
        self.status.subscribe()
    }

    /// True while a manual retry is in flight. Callers should not start
    /// another retry until it clears.
    pub fn is_retrying(&self) -> bool {
        self.retrying.load(Ordering::SeqCst)
    }

    /// Apply a platform transition. Notifies only when the status changes;
    /// the offline notice stays up until connectivity returns.
    pub fn handle_event(&self, event: ConnectivityEvent) {
        let next = ConnectivityStatus::from(event);
        if !self.transition(next) {
            return;
        }

        match next {
            ConnectivityStatus::Offline => {
                tracing::warn!("Connectivity lost");
                self.notifier
                    .notify(Notification::warning(messages::CONNECTION_LOST).persistent());
            }
            ConnectivityStatus::Online => {
                tracing::info!("Connectivity restored");
                self.notifier
                    .notify(Notification::success(messages::CONNECTION_RESTORED));
            }
        }
    }

    /// Feed platform events from `events` until the sender side closes
    pub fn spawn(
        self: Arc<Self>,
        mut events: mpsc::Receiver<ConnectivityEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.handle_event(event);
            }
            tracing::debug!("Connectivity event stream closed");
        })
    }

    /// Manual retry: probe the gateway once and report the result
    pub async fn retry(&self) -> ConnectivityStatus {
        self.retrying.store(true, Ordering::SeqCst);
        let _retrying = RetryFlag(&self.retrying);

        match probe(self.gateway.as_ref(), &self.probe_table).await {
            Ok(()) => {
                self.transition(ConnectivityStatus::Online);
                self.notifier
                    .notify(Notification::success(messages::RETRY_SUCCEEDED));
                ConnectivityStatus::Online
            }
            Err(e) => {
                tracing::warn!("Connectivity retry failed: {}", e);
                self.transition(ConnectivityStatus::Offline);
                self.notifier
                    .notify(Notification::error(messages::RETRY_FAILED, e.message()));
                ConnectivityStatus::Offline
            }
        }
    }

    fn transition(&self, next: ConnectivityStatus) -> bool {
        self.status.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }
}

/// Clears the retry flag when the retry finishes or is dropped
struct RetryFlag<'a>(&'a AtomicBool);

impl Drop for RetryFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
