//! Build toolchain collaborator
//!
//! The configure/build tool is opaque: it is asked to configure a source
//! tree for an install prefix and then to build and install, each call
//! either succeeding or failing. CMake is the shipped implementation.

mod cmake;
mod prune;
mod target;

pub use cmake::CmakeToolchain;
pub use prune::PrunePolicy;
pub use target::{BuildTarget, TargetState};

use crate::error::DepchainResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;

/// Extra environment handed to every toolchain subprocess
pub type ToolEnv = BTreeMap<String, String>;

/// Abstract configure/install interface
#[async_trait]
pub trait BuildToolchain: Send + Sync {
    /// Configure `source_dir` into `binary_dir` for `install_prefix`.
    ///
    /// `options` are passed verbatim, in order, after the prefix.
    async fn configure(
        &self,
        source_dir: &Path,
        binary_dir: &Path,
        install_prefix: &Path,
        generator: &str,
        options: &[String],
        env: &ToolEnv,
    ) -> DepchainResult<()>;

    /// Build and install from a configured `binary_dir`
    async fn install(&self, binary_dir: &Path, env: &ToolEnv) -> DepchainResult<()>;
}
