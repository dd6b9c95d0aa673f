use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub catalog_url: Option<String>,
    #[serde(default)]
    pub auto_open: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// The environment variable wins over the config file. The UI never
    /// writes the credential back to disk; edits stay in memory.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("portfolio-cli").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_full_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"api_key": "sk-test", "model": "gpt-4o", "catalog_url": "https://example.com/projects.json", "auto_open": true}}"#
        )
        .expect("write config");

        let config = Config::load_from(file.path()).expect("config should parse");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert!(config.auto_open);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{}}").expect("write config");

        let config = Config::load_from(file.path()).expect("config should parse");
        assert!(config.api_key.is_none());
        assert!(config.catalog_url.is_none());
        assert!(!config.auto_open);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write config");

        assert!(Config::load_from(file.path()).is_err());
    }
}
