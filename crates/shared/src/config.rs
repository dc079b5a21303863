//! Application configuration management.

use serde::Deserialize;

use crate::error::AppResult;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Seeder configuration.
    #[serde(default)]
    pub seeder: SeederConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// PostgreSQL `search_path` (tenant schema first, then the public
    /// reference schema). Ignored for other backends.
    #[serde(default = "default_search_path")]
    pub search_path: Option<String>,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

#[allow(clippy::unnecessary_wraps)]
fn default_search_path() -> Option<String> {
    Some("cmis,public".to_string())
}

/// Seeder configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SeederConfig {
    /// Whether the optional demo-content stages run.
    #[serde(default = "default_include_demo")]
    pub include_demo: bool,
    /// Plain-text password given to every demo user (hashed before insert).
    #[serde(default = "default_demo_password")]
    pub demo_password: String,
    /// Treat a failing optional stage like a required one.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            include_demo: default_include_demo(),
            demo_password: default_demo_password(),
            fail_fast: false,
        }
    }
}

fn default_include_demo() -> bool {
    true
}

fn default_demo_password() -> String {
    "password".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `CMIS__*` variables
    /// (e.g. `CMIS__DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        Ok(Self::builder().build()?.try_deserialize()?)
    }

    /// Loads configuration, falling back to a bare `DATABASE_URL` variable
    /// when no `CMIS__DATABASE__URL` is configured.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if configuration cannot be loaded.
    pub fn load_with_database_url_fallback() -> AppResult<Self> {
        match std::env::var("DATABASE_URL") {
            Ok(url) if std::env::var("CMIS__DATABASE__URL").is_err() => Ok(Self::builder()
                .set_override("database.url", url)?
                .build()?
                .try_deserialize()?),
            _ => Self::load(),
        }
    }

    fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CMIS").separator("__"))
    }
}
