//! Editor configuration file
//!
//! ```text
//! EditorConfig
//!   ├── backend: BackendConfig
//!   │   ├── base_url: String
//!   │   └── timeout_secs: u64
//!   ├── repaint_delay_ms: u64
//!   └── default_max_scale: f64
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::style::DEFAULT_MAX_SCALE;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub backend: BackendConfig,
    pub repaint_delay_ms: u64,
    pub default_max_scale: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            repaint_delay_ms: 200,
            default_max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8180/API".to_string(),
            timeout_secs: 30,
        }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` when it exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let yaml = EditorConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("base_url"));
        assert!(yaml.contains("repaint_delay_ms: 200"));
    }

    #[test]
    fn test_partial_deserialization() {
        let yaml = r#"
backend:
  base_url: https://maps.example.org/API
repaint_delay_ms: 50
"#;
        let config: EditorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.base_url, "https://maps.example.org/API");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.repaint_delay_ms, 50);
        assert_eq!(config.default_max_scale, DEFAULT_MAX_SCALE);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styledit.yaml");
        std::fs::write(&path, "default_max_scale: 1000.0\n").unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.default_max_scale, 1000.0);
    }
}
