use crate::model::{Category, ConfigError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// How a searched device is compared with the names listed on a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Normalized equality.
    #[default]
    Exact,
    /// Listed name contains the searched one, after normalization.
    Contains,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub strategy: MatchStrategy,
    pub include_similar: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
    pub db_path: String,
    pub default_category: String,
    pub matcher: MatcherConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://proglide-backend.vercel.app/api".to_string(),
            request_timeout_seconds: 30,
            db_path: "proglide.db".to_string(),
            default_category: Category::ScreenGuard.label().to_string(),
            matcher: MatcherConfig::default(),
        }
    }
}

impl AppConfig {
    /// Falls back to screen guards when the configured label is not a known category.
    pub fn default_category(&self) -> Category {
        Category::from_label(&self.default_category).unwrap_or(Category::ScreenGuard)
    }
}

/// Reads the JSON config at `path`. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
