use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest page the backend accepts for `/api/requests`
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Write logs here instead of stderr (keeps the terminal dashboard clean)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_page_size() -> usize {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

/// Load configuration: defaults, then the optional TOML file, then
/// `TIMEGLASS__*` environment variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("TIMEGLASS").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.dashboard.page_size == 0 || cfg.dashboard.page_size > MAX_PAGE_SIZE {
        anyhow::bail!(
            "Invalid dashboard.page_size: {}. Must be between 1 and {}",
            cfg.dashboard.page_size,
            MAX_PAGE_SIZE
        );
    }

    let url = reqwest::Url::parse(&cfg.api.base_url)
        .map_err(|e| anyhow::anyhow!("Invalid api.base_url '{}': {}", cfg.api.base_url, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("api.base_url must use http or https, got '{}'", url.scheme());
    }

    match cfg.logging.format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid logging.format: '{}'. Must be one of: text, json", other),
    }

    Ok(())
}
