use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{InsightError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the classification backend's REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout applied to every API call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| InsightError::Config(format!("Failed to parse {:?}: {}", path, e)))?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let config = Config::load(Path::new("does-not-exist.toml")).await.unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout(), Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[backend]\nbase_url = \"https://insight.example/api\"\n")
            .await
            .unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.backend.base_url, "https://insight.example/api");
        assert_eq!(config.backend.timeout_secs, 20);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "backend = 12").await.unwrap();

        let err = Config::load(&path).await.unwrap_err();
        assert!(matches!(err, InsightError::Config(_)));
    }
}
