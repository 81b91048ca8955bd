//! Connectivity tracking and periodic health checks against the gateway

pub mod connectivity;
pub mod health;

pub use connectivity::{ConnectivityEvent, ConnectivityMonitor, ConnectivityStatus};
pub use health::{HealthMonitor, HealthMonitorHandle, HealthReport, HealthStatus};

use crate::modules::gateway::{GatewayResult, SelectQuery, TableGateway};

/// Smallest possible read, used as a liveness probe
pub(crate) async fn probe(gateway: &dyn TableGateway, table: &str) -> GatewayResult<()> {
    gateway
        .select(table, &SelectQuery::new().columns("id").limit(1))
        .await
        .map(|_| ())
}
