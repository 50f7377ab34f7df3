//! Install-tree pruning
//!
//! Some projects install large files that downstream builds never read.
//! Pruning runs right after such a project installs, to keep the cached
//! install root small.

use crate::error::{DepchainError, DepchainResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// What to delete from an install destination after installing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrunePolicy {
    /// `bin/*.pdb`, plus `lib/*.lib` that are static archives rather than
    /// import libraries (an import library has a sibling `.exp`)
    DebugSymbols,
}

impl PrunePolicy {
    /// Apply the policy and return the removed files
    pub async fn apply(self, install_dir: &Path) -> DepchainResult<Vec<PathBuf>> {
        match self {
            Self::DebugSymbols => prune_debug_symbols(install_dir).await,
        }
    }
}

async fn prune_debug_symbols(install_dir: &Path) -> DepchainResult<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for pdb in files_with_extension(&install_dir.join("bin"), "pdb").await? {
        remove(&pdb).await?;
        removed.push(pdb);
    }

    let lib_dir = install_dir.join("lib");
    let import_libs: HashSet<_> = files_with_extension(&lib_dir, "exp")
        .await?
        .iter()
        .filter_map(|p| p.file_stem().map(OsStr::to_os_string))
        .collect();

    for lib in files_with_extension(&lib_dir, "lib").await? {
        let is_import = lib
            .file_stem()
            .is_some_and(|stem| import_libs.contains(stem));
        if !is_import {
            remove(&lib).await?;
            removed.push(lib);
        }
    }

    debug!("Pruned {} files from {}", removed.len(), install_dir.display());
    Ok(removed)
}

/// Regular files directly inside `dir` with the given extension; a missing
/// directory yields nothing
async fn files_with_extension(dir: &Path, extension: &str) -> DepchainResult<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(DepchainError::io(
                format!("listing {}", dir.display()),
                e,
            ))
        }
    };

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DepchainError::io(format!("listing {}", dir.display()), e))?
    {
        let path = entry.path();
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if is_file && path.extension() == Some(OsStr::new(extension)) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn remove(path: &Path) -> DepchainResult<()> {
    fs::remove_file(path)
        .await
        .map_err(|e| DepchainError::io(format!("removing {}", path.display()), e))
}
