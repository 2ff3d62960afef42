use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub api_keys: Option<ApiKeysConfig>,
    pub search: Option<SearchConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiKeysConfig {
    pub apollo_api_key: Option<String>,
    pub hunter_api_key: Option<String>,
    pub coresignal_api_key: Option<String>,
    pub hubspot_access_token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub delay_ms: u64,
    pub request_timeout_secs: u64,
    pub per_page: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            delay_ms: 200,
            request_timeout_secs: 10,
            per_page: 50,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

const DEFAULT_CONFIG: &str = r#"
[api_keys]
# apollo_api_key = "your-apollo-key"
# hunter_api_key = "your-hunter-key"
# coresignal_api_key = "your-coresignal-key"
# hubspot_access_token = "your-hubspot-private-app-token"

[search]
# Pause between provider calls, in milliseconds
delay_ms = 200
request_timeout_secs = 10
per_page = 50

[display]
page_size = 10
"#;

impl AppConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    /// Read `path`, then let `LEADMERGE__SECTION__KEY` environment variables override it
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(Environment::with_prefix("LEADMERGE").separator("__"))
            .build()?;

        builder.try_deserialize()
    }

    pub fn search(&self) -> SearchConfig {
        self.search.clone().unwrap_or_default()
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    pub fn api_keys(&self) -> ApiKeysConfig {
        self.api_keys.clone().unwrap_or_default()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("leadmerge").join("config.toml")
    } else {
        PathBuf::from("leadmerge.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        let search = config.search();
        assert_eq!(search.delay_ms, 200);
        assert_eq!(search.request_timeout_secs, 10);
        assert_eq!(search.per_page, 50);
        assert_eq!(config.display().page_size, 10);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api_keys]\nhunter_api_key = \"abc\"\ncoresignal_api_key = \"cs\"\n\n[search]\ndelay_ms = 1000\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api_keys().hunter_api_key.as_deref(), Some("abc"));
        assert_eq!(config.api_keys().coresignal_api_key.as_deref(), Some("cs"));
        assert_eq!(config.search().delay_ms, 1000);
        assert_eq!(config.search().per_page, 50);
        assert_eq!(config.display().page_size, 10);
    }
}
