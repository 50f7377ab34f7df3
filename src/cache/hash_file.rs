//! One-line hash record per project
//!
//! `<install_root>/<identity>.hash` holds the content hash of the revision
//! whose build output currently sits in the install destination.

use crate::error::{DepchainError, DepchainResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Extension of the per-project hash record
pub const HASH_FILE_EXTENSION: &str = "hash";

/// Persisted "last successful build" record of one project
#[derive(Debug, Clone)]
pub struct HashCache {
    path: PathBuf,
}

impl HashCache {
    /// Record for `identity` under `install_root`
    pub fn for_project(install_root: &Path, identity: &str) -> Self {
        Self {
            path: install_root.join(format!("{}.{}", identity, HASH_FILE_EXTENSION)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First line of the record, trimmed; `None` when absent or blank
    pub async fn read(&self) -> DepchainResult<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let hash = content.lines().next().unwrap_or("").trim();
                if hash.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(hash.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DepchainError::io(
                format!("reading hash file {}", self.path.display()),
                e,
            )),
        }
    }

    /// Replace the record with exactly one line holding `hash`.
    ///
    /// Written to a sibling temp file and renamed into place so readers
    /// never see a partial record.
    pub async fn write(&self, hash: &str) -> DepchainResult<()> {
        let failed = |source| DepchainError::CacheWriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(failed)?;
        }

        let tmp = self.path.with_extension(format!("{}.{}", HASH_FILE_EXTENSION, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, format!("{}\n", hash.trim())).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(failed(e));
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(failed(e));
        }

        debug!("Wrote {} to {}", hash.trim(), self.path.display());
        Ok(())
    }

    /// Delete the record if present
    pub async fn invalidate(&self) -> DepchainResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Invalidated {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DepchainError::io(
                format!("removing hash file {}", self.path.display()),
                e,
            )),
        }
    }
}
