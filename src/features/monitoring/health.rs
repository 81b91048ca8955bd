use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::config::MonitorConfig;
use crate::features::monitoring::probe;
use crate::modules::gateway::TableGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

pub struct HealthMonitor {
    gateway: Arc<dyn TableGateway>,
    probe_table: String,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(gateway: Arc<dyn TableGateway>, config: &MonitorConfig) -> Self {
        Self {
            gateway,
            probe_table: config.probe_table.clone(),
            interval: config.health_check_interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Probe the gateway once. Failures are reported, never returned.
    pub async fn check_health(&self) -> HealthReport {
        let result = probe(self.gateway.as_ref(), &self.probe_table).await;
        let checked_at = Utc::now();

        match result {
            Ok(()) => HealthReport {
                status: HealthStatus::Ok,
                error: None,
                checked_at,
            },
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                HealthReport {
                    status: HealthStatus::Error,
                    error: Some(e.message().to_string()),
                    checked_at,
                }
            }
        }
    }

    /// Check immediately, then on every interval tick, until the handle
    /// is stopped or dropped
    pub fn start(self: Arc<Self>) -> HealthMonitorHandle {
        let (tx, rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let report = self.check_health().await;
                tracing::debug!(status = ?report.status, "Health check completed");
                if tx.send(Some(report)).is_err() {
                    break;
                }
            }
        });

        HealthMonitorHandle { reports: rx, task }
    }
}

/// Owns the polling task; the task is aborted on [`stop`](Self::stop) or drop
#[derive(Debug)]
pub struct HealthMonitorHandle {
    reports: watch::Receiver<Option<HealthReport>>,
    task: JoinHandle<()>,
}

impl HealthMonitorHandle {
    pub fn latest(&self) -> Option<HealthReport> {
        self.reports.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<HealthReport>> {
        self.reports.clone()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for HealthMonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{MockGateway, Op};

    fn monitor(gateway: &MockGateway, interval_ms: u64) -> Arc<HealthMonitor> {
        let config = MonitorConfig {
            health_check_interval: Duration::from_millis(interval_ms),
            ..MonitorConfig::default()
        };
        Arc::new(HealthMonitor::new(Arc::new(gateway.clone()), &config))
    }

    #[tokio::test]
    async fn test_check_health_ok() {
        let gateway = MockGateway::new();
        let report = monitor(&gateway, 30_000).check_health().await;

        assert!(report.is_ok());
        assert!(report.error.is_none());
        let call = &gateway.calls()[0];
        assert_eq!(call.op, Op::Select);
        assert_eq!(call.table, "categories");
    }

    #[tokio::test]
    async fn test_failing_read_reports_error_message() {
        let gateway = MockGateway::new();
        gateway.fail_on(Op::Select, "categories", "connection refused");

        let report = monitor(&gateway, 30_000).check_health().await;

        assert_eq!(report.status, HealthStatus::Error);
        assert_eq!(report.error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_start_publishes_reports_until_stopped() {
        let gateway = MockGateway::new();
        let handle = monitor(&gateway, 10).start();
        let mut reports = handle.subscribe();

        tokio::time::timeout(Duration::from_secs(2), reports.wait_for(|r| r.is_some()))
            .await
            .unwrap()
            .unwrap();
        assert!(handle.latest().unwrap().is_ok());

        gateway.fail_on(Op::Select, "categories", "down");
        tokio::time::timeout(
            Duration::from_secs(2),
            reports.wait_for(|r| r.as_ref().is_some_and(|r| !r.is_ok())),
        )
        .await
        .unwrap()
        .unwrap();

        handle.stop();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let calls = gateway.total_calls();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gateway.total_calls(), calls);
    }
}
