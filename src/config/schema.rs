//! Configuration schema for depchain
//!
//! The chain is described in `depchain.toml`: one `[general]` table and an
//! ordered `[[project]]` array.

use crate::artifact::ArtifactSpec;
use crate::toolchain::PrunePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run-wide settings
    pub general: GeneralConfig,

    /// Projects in declaration order
    #[serde(rename = "project")]
    pub projects: Vec<ProjectConfig>,
}

/// Run-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// CMake generator, e.g. "Ninja" or "Visual Studio 17 2022"
    pub generator: Option<String>,

    /// Build configuration passed to `cmake --build --config`
    pub build_config: String,

    /// Target that installs, "install" or "INSTALL" for Visual Studio
    pub install_target: String,

    /// Root of install destinations and hash files
    pub install_root: Option<PathBuf>,

    /// Directory under which projects are cloned
    pub source_root: PathBuf,

    /// Shallow clone depth for branch/tag projects
    pub clone_depth: Option<u32>,

    /// Install from `[project.artifact]` instead of building when available
    pub prefer_artifacts: bool,

    /// Write a hash record after an artifact install
    pub track_artifacts: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            generator: None,
            build_config: "Release".to_string(),
            install_target: "install".to_string(),
            install_root: None,
            source_root: PathBuf::from("."),
            clone_depth: None,
            prefer_artifacts: false,
            track_artifacts: false,
            log_format: "text".to_string(),
        }
    }
}

/// One `[[project]]` entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Git remote URL
    pub url: String,

    /// Identity override; defaults to the repository name from `url`
    pub name: Option<String>,

    /// Branch or tag to follow
    pub branch: Option<String>,

    /// Commit to pin, exclusive with `branch`
    pub commit: Option<String>,

    /// Extra configure options, passed verbatim in order
    pub options: Vec<String>,

    /// Projects whose install output this one consumes.
    /// Omitted means the previous project in the file.
    pub depends_on: Option<Vec<String>>,

    /// Environment variable that receives this project's install directory
    pub export_env: Option<String>,

    /// Cleanup applied after installing from source
    pub prune: Option<PrunePolicy>,

    /// Prebuilt archive that may replace a source build
    pub artifact: Option<ArtifactSpec>,
}
