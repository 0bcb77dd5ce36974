use perflab_core::WiringMode;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
    #[serde(default)]
    pub services: ServicesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

/// Limits for the bulk insert endpoints
#[derive(Debug, Deserialize, Clone)]
pub struct BulkConfig {
    /// Used when the request carries no `count`
    #[serde(default = "default_bulk_count")]
    pub default_count: i64,
    /// Unset means unbounded
    #[serde(default)]
    pub max_count: Option<i64>,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            default_count: default_bulk_count(),
            max_count: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub wiring: WiringMode,
    #[serde(default = "default_work_delay_ms")]
    pub work_delay_ms: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            wiring: WiringMode::default(),
            work_delay_ms: default_work_delay_ms(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout() -> u64 { 3 }
fn default_bulk_count() -> i64 { 1000 }
fn default_work_delay_ms() -> u64 { 10 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `PERFLAB__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("PERFLAB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
