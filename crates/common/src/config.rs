//! Configuration management for the application.
//!
//! Settings are layered with the `config` crate. Later sources override
//! earlier ones:
//! 1. Built-in defaults
//! 2. `config/default.toml` (if it exists)
//! 3. `config/{APP_ENV}.toml` (if it exists)
//! 4. Environment variables prefixed with `APP_`, `__` separating sections
//!
//! ## Example Configuration
//!
//! ```toml
//! [database]
//! url = "sqlite://data/accredigo.db"
//! pool_size = 10
//!
//! [telemetry]
//! json_logging = true
//! log_level = "info"
//!
//! [pagination]
//! default_page_size = 10
//! max_page_size = 100
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub timeout_seconds: u64,

    /// Apply embedded migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to log records
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// List endpoint paging limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

/// Account security settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum accepted password length
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Length of an explore user's trial in days
    #[serde(default = "default_trial_days")]
    pub explore_trial_days: i64,
}

fn default_database_url() -> String {
    "sqlite://accredigo.db".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_db_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_service_name() -> String {
    "accredigo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_min_password_length() -> usize {
    8
}

fn default_trial_days() -> i64 {
    14
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            pool_size: default_pool_size(),
            timeout_seconds: default_db_timeout(),
            run_migrations: true,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
            explore_trial_days: default_trial_days(),
        }
    }
}

impl AppConfig {
    /// Load configuration from configuration files and environment variables.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use accredigo_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Database: {}", config.database.url);
    /// ```
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load_from("config", &env)
    }

    /// Load configuration rooted at `dir` for the named environment.
    pub fn load_from(dir: &str, env: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/{}", dir, env)).required(false))
            // Example: APP_DATABASE__URL=sqlite://prod.db
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("Database URL is required");
        }

        if self.database.pool_size == 0 {
            anyhow::bail!("Database pool size must be greater than 0");
        }

        if self.database.timeout_seconds == 0 {
            anyhow::bail!("Database timeout must be greater than 0");
        }

        if self.pagination.default_page_size == 0 {
            anyhow::bail!("Default page size must be greater than 0");
        }

        if self.pagination.default_page_size > self.pagination.max_page_size {
            anyhow::bail!("Default page size cannot exceed the maximum page size");
        }

        if self.auth.min_password_length < 6 {
            anyhow::bail!("Minimum password length must be at least 6");
        }

        if self.auth.explore_trial_days <= 0 {
            anyhow::bail!("Explore trial must last at least one day");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Get the database connection timeout as a Duration
    pub fn database_timeout(&self) -> Duration {
        Duration::from_secs(self.database.timeout_seconds)
    }

    /// Create a development configuration with sensible defaults
    pub fn development() -> Self {
        Self {
            database: DatabaseSettings {
                url: "sqlite://accredigo-dev.db".to_string(),
                pool_size: 5,
                ..DatabaseSettings::default()
            },
            telemetry: TelemetryConfig {
                service_name: "accredigo-dev".to_string(),
                json_logging: false,
                log_level: "debug".to_string(),
            },
            pagination: PaginationConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}
