use std::sync::Arc;

use promptvault_core::core::config::Config;
use promptvault_core::features::categories::CategoryService;
use promptvault_core::features::comments::CommentService;
use promptvault_core::features::library::{LibraryLoader, PromptStore, StatsState};
use promptvault_core::features::monitoring::{
    ConnectivityEvent, ConnectivityMonitor, ConnectivityStatus, HealthMonitor, HealthStatus,
};
use promptvault_core::features::prompts::PromptService;
use promptvault_core::features::ratings::RatingStatsService;
use promptvault_core::features::refresh::{RefreshCoordinator, RefreshSignal};
use promptvault_core::modules::gateway::{RestGateway, TableGateway};
use promptvault_core::shared::constants::PROMPTS_DATASET;
use promptvault_core::shared::notifications::{Notifier, TracingNotifier};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load configuration before the runtime so the worker count can come from it
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let worker_threads = config.app.worker_threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4)
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config, worker_threads))
}

async fn async_main(config: Config, worker_threads: usize) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let gateway: Arc<dyn TableGateway> = Arc::new(
        RestGateway::new(&config.gateway)
            .map_err(|e| anyhow::anyhow!("Failed to initialize gateway client: {}", e))?,
    );
    tracing::info!("Gateway client initialized for {}", config.gateway.url);

    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

    // Entity services
    let category_service = Arc::new(CategoryService::new(Arc::clone(&gateway)));
    let prompt_service = Arc::new(PromptService::new(Arc::clone(&gateway)));
    let comment_service = Arc::new(CommentService::new(
        Arc::clone(&gateway),
        Arc::clone(&prompt_service),
    ));
    let rating_service = Arc::new(RatingStatsService::new(Arc::clone(&gateway)));
    tracing::info!("Entity services initialized");

    // Local library
    let store = PromptStore::new().shared();
    let loader = Arc::new(LibraryLoader::new(
        Arc::clone(&store),
        category_service,
        Arc::clone(&prompt_service),
        comment_service,
        Arc::clone(&rating_service),
    ));
    let stats = StatsState::new(
        Arc::clone(&store),
        prompt_service,
        rating_service,
        Arc::clone(&notifier),
    );

    // Initial load failures are not fatal; the next refresh retries
    match loader.load().await {
        Ok(_) => tracing::info!("Library summary: {:?}", stats.summary().await),
        Err(e) => tracing::error!("Initial library load failed: {}", e),
    }

    let coordinator = Arc::new(RefreshCoordinator::default());
    coordinator.register(PROMPTS_DATASET, loader);
    let _listener = coordinator.listen(PROMPTS_DATASET);
    tracing::info!("Refresh listener registered for '{}'", PROMPTS_DATASET);

    // Health reports drive connectivity transitions in headless mode
    let connectivity = Arc::new(ConnectivityMonitor::new(
        Arc::clone(&gateway),
        &config.monitor,
        Arc::clone(&notifier),
    ));
    let (events_tx, events_rx) = mpsc::channel(16);
    let connectivity_task = Arc::clone(&connectivity).spawn(events_rx);
    let mut connectivity_status = connectivity.watch();

    let health = Arc::new(HealthMonitor::new(gateway, &config.monitor)).start();
    let mut reports = health.subscribe();
    tracing::info!(
        "Health monitor started (interval {:?})",
        config.monitor.health_check_interval
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            changed = reports.changed() => {
                if changed.is_err() {
                    tracing::warn!("Health monitor stopped unexpectedly");
                    break;
                }
                let report = reports.borrow_and_update().clone();
                if let Some(report) = report {
                    let event = match report.status {
                        HealthStatus::Ok => ConnectivityEvent::Online,
                        HealthStatus::Error => ConnectivityEvent::Offline,
                    };
                    if events_tx.send(event).await.is_err() {
                        tracing::warn!("Connectivity listener is gone");
                    }
                }
            }
            changed = connectivity_status.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *connectivity_status.borrow_and_update();
                if status == ConnectivityStatus::Online {
                    coordinator.publish(RefreshSignal::PromptsUpdated);
                }
            }
        }
    }

    health.stop();
    drop(events_tx);
    if let Err(e) = connectivity_task.await {
        tracing::warn!("Connectivity task ended abnormally: {}", e);
    }
    tracing::info!("Shutdown complete");

    Ok(())
}
