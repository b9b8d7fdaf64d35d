use serde::Deserialize;

use crate::models::Service;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub aggregation: AggregationConfig,
    /// Monitored fleet; read-only reference data for the process lifetime.
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    /// Events older than this are pruned. Must cover the longest window (12 months).
    #[serde(default = "default_retention_months")]
    pub retention_months: u32,
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
    /// Optional cron expression for VACUUM (e.g. "0 3 * * *" = 03:00 daily). Uses local time.
    #[serde(default)]
    pub vacuum_schedule: Option<String>,
    /// Run VACUUM every N seconds when vacuum_schedule is not set.
    #[serde(default = "default_vacuum_interval_secs")]
    pub vacuum_interval_secs: u64,
}

fn default_retention_months() -> u32 {
    13
}

fn default_prune_interval_secs() -> u64 {
    3600
}

fn default_vacuum_interval_secs() -> u64 {
    86_400
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Max concurrent event-store queries during report fan-out.
    #[serde(default = "default_max_concurrent_queries")]
    pub max_concurrent_queries: usize,
    /// Deadline per service; a slow store query surfaces as a per-service
    /// failure instead of blocking the whole report.
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

fn default_max_concurrent_queries() -> usize {
    4
}

fn default_query_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.retention_months >= 12,
            "database.retention_months must cover the 12-month window, got {}",
            self.database.retention_months
        );
        anyhow::ensure!(
            self.database.prune_interval_secs > 0,
            "database.prune_interval_secs must be > 0, got {}",
            self.database.prune_interval_secs
        );
        anyhow::ensure!(
            self.database.vacuum_interval_secs > 0,
            "database.vacuum_interval_secs must be > 0, got {}",
            self.database.vacuum_interval_secs
        );
        anyhow::ensure!(
            self.aggregation.max_concurrent_queries > 0,
            "aggregation.max_concurrent_queries must be > 0, got {}",
            self.aggregation.max_concurrent_queries
        );
        anyhow::ensure!(
            self.aggregation.query_timeout_secs > 0,
            "aggregation.query_timeout_secs must be > 0, got {}",
            self.aggregation.query_timeout_secs
        );
        for service in &self.services {
            anyhow::ensure!(!service.name.is_empty(), "services: name must be non-empty");
            anyhow::ensure!(
                !service.url.is_empty(),
                "services: url must be non-empty for {}",
                service.name
            );
            anyhow::ensure!(
                !service.region.is_empty(),
                "services: region must be non-empty for {}",
                service.name
            );
            anyhow::ensure!(
                !service.location.is_empty(),
                "services: location must be non-empty for {}",
                service.name
            );
        }
        let mut names: Vec<&str> = self.services.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        anyhow::ensure!(
            names.len() == self.services.len(),
            "services: names must be unique"
        );
        Ok(())
    }
}
