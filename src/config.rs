use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "./widget-layout.toml";
pub const DEFAULT_API_PREFIX: &str = "/api/widget-layout/v1";

/// Top-level config loaded from `widget-layout.toml`, then overridden from the environment.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalogs: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Versioned path the template API is mounted under.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            api_prefix: default_api_prefix(),
        }
    }
}

fn default_bind_addr() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8000
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "./widget_layout.db".to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Crate log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Catalog sources. Inline JSON (from the environment) wins over files.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    #[serde(default)]
    pub base_templates: String,
    #[serde(default)]
    pub widget_mapping: String,
    pub base_templates_file: Option<PathBuf>,
    pub widget_mapping_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load config from a TOML file. Returns defaults if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by `WIDGET_LAYOUT_CONFIG` and applies environment overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var("WIDGET_LAYOUT_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `WEB_PORT`, `BIND_ADDR`, `DATABASE_PATH`, `LOG_LEVEL`, `API_PREFIX`,
    /// `BASE_WIDGET_DASHBOARD_TEMPLATES` and `WIDGET_MAPPING_CONFIG` from `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = non_empty("WEB_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid WEB_PORT {port:?}: {e}"))?;
        }
        if let Some(addr) = non_empty("BIND_ADDR") {
            self.server.bind_addr = addr
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid BIND_ADDR {addr:?}: {e}"))?;
        }
        if let Some(path) = non_empty("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(level) = non_empty("LOG_LEVEL") {
            self.logging.level = level.trim().to_lowercase();
        }
        if let Some(prefix) = lookup("API_PREFIX") {
            self.server.api_prefix = prefix;
        }
        if let Some(bases) = non_empty("BASE_WIDGET_DASHBOARD_TEMPLATES") {
            self.catalogs.base_templates = bases;
        }
        if let Some(mappings) = non_empty("WIDGET_MAPPING_CONFIG") {
            self.catalogs.widget_mapping = mappings;
        }
        self.server.api_prefix = normalize_prefix(&self.server.api_prefix);
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind_addr, self.server.port)
    }
}

/// `""` and `"/"` mean the root; anything else gets one leading slash and no trailing one.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

impl CatalogConfig {
    /// JSON source of the base template catalog (may be empty).
    pub fn base_templates_source(&self) -> anyhow::Result<String> {
        resolve_source(&self.base_templates, self.base_templates_file.as_deref())
    }

    /// JSON source of the widget mapping catalog (may be empty).
    pub fn widget_mapping_source(&self) -> anyhow::Result<String> {
        resolve_source(&self.widget_mapping, self.widget_mapping_file.as_deref())
    }
}

fn resolve_source(inline: &str, file: Option<&Path>) -> anyhow::Result<String> {
    if !inline.trim().is_empty() {
        return Ok(inline.to_string());
    }
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read catalog file {}: {e}", path.display())),
        None => Ok(String::new()),
    }
}
