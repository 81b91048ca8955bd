use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub gateway: GatewayConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub worker_threads: Option<usize>,
}

/// Connection settings for the hosted table store
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous or service API key, sent as `apikey` and bearer token
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub health_check_interval: Duration,
    /// Table read with `limit 1` by liveness probes
    pub probe_table: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            gateway: GatewayConfig::from_env()?,
            monitor: MonitorConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let worker_threads = match env::var("TOKIO_WORKER_THREADS") {
            Ok(value) => Some(
                value
                    .parse::<usize>()
                    .map_err(|_| "TOKIO_WORKER_THREADS must be a valid number".to_string())?,
            ),
            Err(_) => None,
        };

        Ok(Self { worker_threads })
    }
}

impl GatewayConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("GATEWAY_URL")
            .map_err(|_| "GATEWAY_URL environment variable is required".to_string())?;

        let api_key = env::var("GATEWAY_API_KEY")
            .map_err(|_| "GATEWAY_API_KEY environment variable is required".to_string())?;

        let timeout_secs = env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "GATEWAY_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl MonitorConfig {
    pub const DEFAULT_HEALTH_CHECK_INTERVAL_MS: u64 = 30_000;

    pub fn from_env() -> Result<Self, String> {
        let interval_ms = env::var("HEALTH_CHECK_INTERVAL_MS")
            .unwrap_or_else(|_| Self::DEFAULT_HEALTH_CHECK_INTERVAL_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "HEALTH_CHECK_INTERVAL_MS must be a valid number".to_string())?;

        if interval_ms == 0 {
            return Err("HEALTH_CHECK_INTERVAL_MS must be greater than zero".to_string());
        }

        let probe_table = env::var("PROBE_TABLE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "categories".to_string());

        Ok(Self {
            health_check_interval: Duration::from_millis(interval_ms),
            probe_table,
        })
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            health_check_interval: Duration::from_millis(Self::DEFAULT_HEALTH_CHECK_INTERVAL_MS),
            probe_table: "categories".to_string(),
        }
    }
}
