//! Immutable settings of one orchestrator run

use crate::config::{ConfigManager, GeneralConfig};
use crate::error::{DepchainError, DepchainResult};
use std::path::{Path, PathBuf};

/// Values the CLI may override on top of `[general]`
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub generator: Option<String>,
    pub install_root: Option<PathBuf>,
    pub prefer_artifacts: bool,
    pub keep_going: bool,
}

/// Everything the orchestrator needs besides the graph and collaborators
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Install destinations and hash files live here
    pub install_root: PathBuf,
    /// Checkouts live at `<source_root>/<identity>`
    pub source_root: PathBuf,
    /// CMake generator for every configure step
    pub generator: String,
    /// Shallow clone depth for branch/tag projects
    pub clone_depth: Option<u32>,
    /// Use `[project.artifact]` for stale projects when present
    pub prefer_artifacts: bool,
    /// Record a hash after an artifact install
    pub track_artifacts: bool,
    /// Continue with independent projects after a failure
    pub keep_going: bool,
}

impl RunContext {
    pub fn new(install_root: PathBuf, source_root: PathBuf, generator: impl Into<String>) -> Self {
        Self {
            install_root,
            source_root,
            generator: generator.into(),
            clone_depth: None,
            prefer_artifacts: false,
            track_artifacts: false,
            keep_going: false,
        }
    }

    /// Resolve the context from `[general]` and CLI overrides.
    ///
    /// Relative paths are made absolute against the working directory, since
    /// the toolchain runs from inside build directories.
    pub fn resolve(
        general: &GeneralConfig,
        overrides: ContextOverrides,
        config_path: &Path,
    ) -> DepchainResult<Self> {
        let generator = overrides
            .generator
            .or_else(|| general.generator.clone())
            .filter(|g| !g.trim().is_empty())
            .ok_or_else(|| DepchainError::ConfigInvalid {
                path: config_path.to_path_buf(),
                reason: "no CMake generator: set general.generator or pass --generator"
                    .to_string(),
            })?;

        Ok(Self {
            install_root: absolute(&resolve_install_root(general, overrides.install_root))?,
            source_root: absolute(&general.source_root)?,
            generator,
            clone_depth: general.clone_depth.filter(|d| *d > 0),
            prefer_artifacts: overrides.prefer_artifacts || general.prefer_artifacts,
            track_artifacts: general.track_artifacts,
            keep_going: overrides.keep_going,
        })
    }
}

/// Install root from the CLI, then `[general]`, then the user cache dir
pub fn resolve_install_root(general: &GeneralConfig, cli: Option<PathBuf>) -> PathBuf {
    cli.or_else(|| general.install_root.clone())
        .unwrap_or_else(ConfigManager::default_install_root)
}

pub(crate) fn absolute(path: &Path) -> DepchainResult<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| DepchainError::io(format!("resolving path {}", path.display()), e))
}
