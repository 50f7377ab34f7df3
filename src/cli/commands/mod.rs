//! CLI command implementations

pub mod build;
pub mod invalidate;
pub mod plan;
pub mod status;

pub use build::execute as build;
pub use invalidate::execute as invalidate;
pub use plan::execute as plan;
pub use status::execute as status;

use crate::chain::resolve_install_root;
use crate::cli::args::RootArgs;
use crate::config::Config;
use crate::error::DepchainResult;
use std::path::PathBuf;

/// Absolute install root for commands that only read local state
pub(crate) fn install_root(config: &Config, root: &RootArgs) -> DepchainResult<PathBuf> {
    let path = resolve_install_root(&config.general, root.install_prefix.clone());
    std::path::absolute(&path).map_err(|e| {
        crate::error::DepchainError::io(format!("resolving path {}", path.display()), e)
    })
}
