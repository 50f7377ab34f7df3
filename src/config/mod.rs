//! Configuration management for depchain

pub mod schema;

pub use schema::{Config, GeneralConfig, ProjectConfig};

use crate::error::{DepchainError, DepchainResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Default chain file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "depchain.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a config manager for `./depchain.toml`
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Default install root when the configuration names none
    pub fn default_install_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("depchain")
            .join("install")
    }

    /// Load the chain file; unlike a settings file it must exist
    pub async fn load(&self) -> DepchainResult<Config> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DepchainError::ConfigNotFound(self.config_path.clone()));
            }
            Err(e) => {
                return Err(DepchainError::io(
                    format!("reading config from {}", self.config_path.display()),
                    e,
                ))
            }
        };

        let config = Self::parse(&self.config_path, &content)?;
        debug!(
            "Loaded {} projects from {}",
            config.projects.len(),
            self.config_path.display()
        );
        Ok(config)
    }

    /// Parse configuration text, attributing errors to `path`
    pub fn parse(path: &Path, content: &str) -> DepchainResult<Config> {
        toml::from_str(content).map_err(|e| DepchainError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("nonexistent.toml"));

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, DepchainError::ConfigNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().to_path_buf());

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, DepchainError::Io { .. }));
    }

    #[tokio::test]
    async fn load_reads_projects() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("depchain.toml");
        std::fs::write(
            &path,
            "[[project]]\nurl = \"https://github.com/jbeder/yaml-cpp.git\"\nbranch = \"yaml-cpp-0.5.3\"\n",
        )
        .unwrap();

        let config = ConfigManager::with_path(path).load().await.unwrap();
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.projects[0].branch.as_deref(), Some("yaml-cpp-0.5.3"));
    }

    #[tokio::test]
    async fn invalid_toml_is_config_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("depchain.toml");
        std::fs::write(&path, "[[project]\nurl = ").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, DepchainError::ConfigInvalid { .. }));
    }
}
