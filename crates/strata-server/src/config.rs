use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base domain appended to tenant slugs for primary hostnames.
    #[serde(default = "default_base_domain")]
    pub base_domain: String,

    /// Path of the SQLite registry database.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Root directory for partition-scoped file storage.
    #[serde(default = "default_storage_root")]
    pub storage_root: String,

    /// Upper bound in seconds on the external structural-change call.
    #[serde(default = "default_structure_timeout_secs")]
    pub structure_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_domain: default_base_domain(),
            database_path: default_database_path(),
            storage_root: default_storage_root(),
            structure_timeout_secs: default_structure_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("STRATA_HOST") {
            self.host = val;
        }

        if let Ok(val) = std::env::var("STRATA_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.port = port;
            }
        }

        if let Ok(val) = std::env::var("STRATA_BASE_DOMAIN") {
            self.base_domain = val;
        }

        if let Ok(val) = std::env::var("STRATA_DATABASE_PATH") {
            self.database_path = val;
        }

        if let Ok(val) = std::env::var("STRATA_STORAGE_ROOT") {
            self.storage_root = val;
        }

        if let Ok(val) = std::env::var("STRATA_STRUCTURE_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                self.structure_timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("STRATA_LOG_LEVEL") {
            self.logging.level = val;
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_domain() -> String {
    "localhost".to_string()
}

fn default_database_path() -> String {
    "./strata.db".to_string()
}

fn default_storage_root() -> String {
    "./storage".to_string()
}

fn default_structure_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
